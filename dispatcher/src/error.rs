//! Error types for the dispatcher.

use thiserror::Error;

use shared_resources::{ElevatorId, Floor};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// No car with this id exists in the fleet.
    #[error("Elevator {0} does not exist")]
    UnknownElevator(ElevatorId),

    /// A watched floor lies outside the building.
    #[error("Floor {floor} is outside 0..{total_floors}")]
    FloorOutOfRange { floor: Floor, total_floors: Floor },

    /// A background thread could not be started.
    #[error("could not spawn {name} thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A line on the intake that could not be understood.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("invalid request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: maintenance <id> on|off")]
    Maintenance,
}
