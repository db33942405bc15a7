use crate::direction::Direction;
use crate::error::RequestError;
use crate::Floor;

/// A validated ride: pick up `num_people` at `current_floor` and visit
/// `destination_floors` in the given order.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Request {
    current_floor: Floor,
    destination_floors: Vec<Floor>,
    num_people: u32,
    direction: Direction,
}

impl Request {
    /// Validates every floor against `[0, total_floors)` and derives the
    /// direction from the first destination.
    ///
    /// The passenger count is taken as given. Deciding what a sensible group
    /// size is belongs to whoever parses the input.
    pub fn new(
        current_floor: Floor,
        destination_floors: Vec<Floor>,
        total_floors: Floor,
        num_people: u32,
    ) -> Result<Self, RequestError> {
        let in_range = |floor: Floor| (0..total_floors).contains(&floor);

        if let Some(&floor) = std::iter::once(&current_floor)
            .chain(destination_floors.iter())
            .find(|&&floor| !in_range(floor))
        {
            return Err(RequestError::OutOfRange { floor, total_floors });
        }

        let first = *destination_floors.first().ok_or(RequestError::NoDestination)?;

        Ok(Request {
            current_floor,
            destination_floors,
            num_people,
            direction: Direction::towards(current_floor, first),
        })
    }

    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    pub fn destination_floors(&self) -> &[Floor] {
        &self.destination_floors
    }

    pub fn num_people(&self) -> u32 {
        self.num_people
    }

    /// Always `Up` or `Down`, never `Idle`.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}
