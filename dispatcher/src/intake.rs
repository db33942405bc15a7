/// ----- INTAKE -----
/// Line-oriented front end. Each line is either a ride as a JSON object,
/// `status`, or `maintenance <id> on|off`. Every line gets exactly one line
/// back.

use log::debug;
use serde::{Deserialize, Serialize};

use shared_resources::{ElevatorId, Floor};

use crate::dispatcher::Dispatcher;
use crate::error::IntakeError;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RideInput {
    pub current_floor: Floor,
    pub destination_floors: Vec<Floor>,
    #[serde(default = "one_person")]
    pub num_people: u32,
}

fn one_person() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ride(RideInput),
    Status,
    Maintenance { elevator: ElevatorId, on: bool },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, IntakeError> {
        let line = line.trim();
        if line.starts_with('{') {
            return Ok(Command::Ride(serde_json::from_str(line)?));
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("status") => Ok(Command::Status),
            Some("maintenance") => {
                let elevator = words
                    .next()
                    .and_then(|id| id.parse().ok())
                    .ok_or(IntakeError::Maintenance)?;
                let on = match words.next() {
                    Some("on") => true,
                    Some("off") => false,
                    _ => return Err(IntakeError::Maintenance),
                };
                if words.next().is_some() {
                    return Err(IntakeError::Maintenance);
                }
                Ok(Command::Maintenance { elevator, on })
            }
            _ => Err(IntakeError::UnknownCommand(line.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub message: String,
}

impl Response {
    pub fn success(message: impl Into<String>) -> Self {
        Response {
            status: Status::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Response {
            status: Status::Error,
            message: message.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Runs one intake line against `dispatcher` and returns the reply. Blank
/// lines get no reply.
pub fn handle_line(dispatcher: &Dispatcher, line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let reply = match Command::parse(line) {
        Ok(Command::Ride(ride)) => {
            match dispatcher.submit(ride.current_floor, ride.destination_floors, ride.num_people) {
                Ok(()) => Response::success("Request received").to_json(),
                Err(e) => Response::error(e).to_json(),
            }
        }
        Ok(Command::Status) => match serde_json::to_string(&dispatcher.status()) {
            Ok(status) => status,
            Err(e) => Response::error(e).to_json(),
        },
        Ok(Command::Maintenance { elevator, on }) => {
            match dispatcher.set_maintenance(elevator, on) {
                Ok(()) => Response::success(format!(
                    "Elevator {} maintenance {}",
                    elevator,
                    if on { "on" } else { "off" }
                ))
                .to_json(),
                Err(e) => Response::error(e).to_json(),
            }
        }
        Err(e) => {
            debug!("Rejected intake line {:?}: {}", line, e);
            Response::error(e).to_json()
        }
    };
    Some(reply)
}
