use crate::direction::Direction;
use crate::{ElevatorId, Floor};

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum Behaviour {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "doorOpen")]
    DoorOpen,
}

impl Behaviour {
    pub fn as_string(&self) -> String {
        match self {
            Behaviour::Idle => String::from("idle"),
            Behaviour::Moving => String::from("moving"),
            Behaviour::DoorOpen => String::from("doorOpen"),
        }
    }
}

/// Point-in-time copy of one car, taken under the car's lock so the fields
/// always belong to the same instant.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ElevatorStatus {
    pub id: ElevatorId,
    pub current_floor: Floor,
    pub destination_floors: Vec<Floor>,
    pub direction: Direction,
    pub door_open: bool,
    pub current_load: u32,
    pub capacity: u32,
    pub maintenance: bool,
    pub behaviour: Behaviour,
}

impl ElevatorStatus {
    pub fn has_capacity_for(&self, num_people: u32) -> bool {
        self.current_load
            .checked_add(num_people)
            .is_some_and(|load| load <= self.capacity)
    }

    pub fn pending_stops(&self) -> usize {
        self.destination_floors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(current_load: u32, capacity: u32) -> ElevatorStatus {
        ElevatorStatus {
            id: 0,
            current_floor: 0,
            destination_floors: vec![3],
            direction: Direction::Up,
            door_open: false,
            current_load,
            capacity,
            maintenance: false,
            behaviour: Behaviour::Moving,
        }
    }

    #[test]
    fn capacity_is_inclusive() {
        let status = loaded(7, 10);
        assert!(status.has_capacity_for(3));
        assert!(!status.has_capacity_for(4));
    }

    #[test]
    fn huge_group_never_fits() {
        assert!(!loaded(1, 10).has_capacity_for(u32::MAX));
        assert!(!loaded(0, 10).has_capacity_for(u32::MAX));
    }

    #[test]
    fn behaviour_uses_camel_case_names() {
        assert_eq!(serde_json::to_string(&Behaviour::DoorOpen).unwrap(), "\"doorOpen\"");
        assert_eq!(Behaviour::Moving.as_string(), "moving");
    }
}
