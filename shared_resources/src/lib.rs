pub mod config;
pub mod direction;
pub mod elevator_status;
pub mod error;
pub mod request;

pub use direction::Direction;
pub use elevator_status::{Behaviour, ElevatorStatus};
pub use error::{ConfigError, RequestError};
pub use request::Request;

/// Floor number. Signed so that out-of-range input below the ground floor
/// can be rejected instead of failing to parse.
pub type Floor = i32;

/// Index of a car within the fleet.
pub type ElevatorId = usize;
