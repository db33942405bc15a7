/// ----- ELEVATOR -----
/// Per-car state machine. Every call to `step` is one time unit: the car
/// either moves one floor towards the lowest pending stop, arrives at it and
/// opens its doors, or counts down the door dwell. When the dwell runs out
/// the doors close and the car takes its next step in the same tick.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use log::debug;

use shared_resources::{Behaviour, Direction, ElevatorId, ElevatorStatus, Floor, Request};

use crate::doors::Doors;

#[derive(Debug, Clone)]
pub struct Elevator {
    id: ElevatorId,
    current_floor: Floor,
    destination_floors: BTreeSet<Floor>,
    total_floors: Floor,
    direction: Direction,
    doors: Doors,
    capacity: u32,
    current_load: u32,
    maintenance: bool,
}

impl Elevator {
    pub fn new(id: ElevatorId, total_floors: Floor, capacity: u32, dwell_ticks: u32) -> Self {
        Elevator {
            id,
            current_floor: 0,
            destination_floors: BTreeSet::new(),
            total_floors,
            direction: Direction::Idle,
            doors: Doors::new(dwell_ticks),
            capacity,
            current_load: 0,
            maintenance: false,
        }
    }

    pub fn id(&self) -> ElevatorId {
        self.id
    }

    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    pub fn total_floors(&self) -> Floor {
        self.total_floors
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn door_open(&self) -> bool {
        self.doors.is_open()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn current_load(&self) -> u32 {
        self.current_load
    }

    pub fn maintenance(&self) -> bool {
        self.maintenance
    }

    pub fn set_maintenance(&mut self, maintenance: bool) {
        self.maintenance = maintenance;
    }

    /// Pending stops, lowest floor first.
    pub fn destination_floors(&self) -> Vec<Floor> {
        self.destination_floors.iter().copied().collect()
    }

    pub fn pending_stops(&self) -> usize {
        self.destination_floors.len()
    }

    pub fn behaviour(&self) -> Behaviour {
        if self.doors.is_open() {
            Behaviour::DoorOpen
        } else if self.destination_floors.is_empty() {
            Behaviour::Idle
        } else {
            Behaviour::Moving
        }
    }

    /// Takes on a request if the group fits. On success the request's stops
    /// are merged into the pending set and the load grows by the group size.
    /// When the group does not fit nothing changes and `false` is returned.
    pub fn add_request(&mut self, request: &Request) -> bool {
        let load = match self.current_load.checked_add(request.num_people()) {
            Some(load) if load <= self.capacity => load,
            _ => return false,
        };
        self.current_load = load;
        self.destination_floors
            .extend(request.destination_floors().iter().copied());
        if self.direction.is_idle() {
            self.refresh_direction();
        }
        true
    }

    /// Advances the car by one time unit. Returns the floor of the stop the
    /// car arrived at during this tick, if any.
    pub fn step(&mut self) -> Option<Floor> {
        if self.doors.is_open() {
            if self.doors.tick() {
                debug!("Elevator {} closing doors at floor {}", self.id, self.current_floor);
                self.advance();
            }
            return None;
        }

        let Some(&target) = self.destination_floors.first() else {
            self.direction = Direction::Idle;
            return None;
        };

        match self.current_floor.cmp(&target) {
            Ordering::Less => {
                self.current_floor += 1;
                self.direction = Direction::Up;
                None
            }
            Ordering::Greater => {
                self.current_floor -= 1;
                self.direction = Direction::Down;
                None
            }
            Ordering::Equal => {
                self.destination_floors.remove(&target);
                self.doors.open();
                self.refresh_direction();
                debug!("Elevator {} arrived at floor {}", self.id, target);
                Some(target)
            }
        }
    }

    pub fn status(&self) -> ElevatorStatus {
        ElevatorStatus {
            id: self.id,
            current_floor: self.current_floor,
            destination_floors: self.destination_floors(),
            direction: self.direction,
            door_open: self.doors.is_open(),
            current_load: self.current_load,
            capacity: self.capacity,
            maintenance: self.maintenance,
            behaviour: self.behaviour(),
        }
    }

    // One floor towards the next stop, right after the doors close. A stop on
    // the current floor is left for the next tick to arrive at.
    fn advance(&mut self) {
        match self.destination_floors.first() {
            Some(&target) if target > self.current_floor => {
                self.current_floor += 1;
                self.direction = Direction::Up;
            }
            Some(&target) if target < self.current_floor => {
                self.current_floor -= 1;
                self.direction = Direction::Down;
            }
            _ => self.refresh_direction(),
        }
    }

    fn refresh_direction(&mut self) {
        self.direction = match self.destination_floors.first() {
            Some(&target) => Direction::towards(self.current_floor, target),
            None => Direction::Idle,
        };
    }
}
