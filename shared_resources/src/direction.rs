use crate::Floor;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    #[default]
    Idle,
    Up,
}

impl Direction {
    /// Direction of travel from `from` towards `to`. A target at the same
    /// floor counts as down, the same rule used to derive a request's
    /// direction.
    pub fn towards(from: Floor, to: Floor) -> Self {
        if to > from {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn as_string(self) -> Option<String> {
        match self {
            Direction::Down => Some(String::from("down")),
            Direction::Up => Some(String::from("up")),
            Direction::Idle => None,
        }
    }

    pub fn is_idle(self) -> bool {
        self == Direction::Idle
    }
}
