/// ----- DOORS -----
/// Keeps track of how long the doors have been open, counted in simulation
/// ticks, so a car at a stop can hold its doors without blocking the thread
/// that drives the rest of the fleet.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doors {
    dwell_ticks: u32,
    remaining: Option<u32>,
}

impl Doors {
    pub fn new(dwell_ticks: u32) -> Self {
        Doors {
            dwell_ticks: dwell_ticks.max(1),
            remaining: None,
        }
    }

    pub fn open(&mut self) {
        self.remaining = Some(self.dwell_ticks);
    }

    pub fn is_open(&self) -> bool {
        self.remaining.is_some()
    }

    /// Counts down one tick of dwell. Returns `true` on the tick the doors
    /// close.
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            Some(left) if left > 1 => {
                self.remaining = Some(left - 1);
                false
            }
            Some(_) => {
                self.remaining = None;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_until_opened() {
        let mut doors = Doors::new(1);
        assert!(!doors.is_open());
        assert!(!doors.tick());
    }

    #[test]
    fn single_tick_dwell() {
        let mut doors = Doors::new(1);
        doors.open();
        assert!(doors.is_open());
        assert!(doors.tick());
        assert!(!doors.is_open());
    }

    #[test]
    fn longer_dwell() {
        let mut doors = Doors::new(3);
        doors.open();
        assert!(!doors.tick());
        assert!(!doors.tick());
        assert!(doors.tick());
        assert!(!doors.is_open());
    }

    #[test]
    fn zero_dwell_is_one_tick() {
        let mut doors = Doors::new(0);
        doors.open();
        assert!(doors.tick());
    }
}
