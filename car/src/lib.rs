//! ----- CAR -----
//! One simulated elevator car: where it is, which stops it still has to
//! make, how many people it carries and whether its doors are open.
//! The car knows nothing about threads; the dispatcher owns one lock per car
//! and drives it one tick at a time.

pub mod doors;
pub mod elevator;

pub use doors::Doors;
pub use elevator::Elevator;
