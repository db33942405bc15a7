//! ----- DISPATCHER -----
//! Fleet-level side of the elevator bank: the pending-request queue, car
//! selection, the dispatch and simulation loops, destination watchers, and
//! the line-based intake used by the `elevator-sim` binary.

pub mod debug;
pub mod dispatcher;
pub mod error;
pub mod intake;
pub mod request_queue;
pub mod simulation;
pub mod watcher;

pub use dispatcher::{Arrival, Assignment, Dispatcher};
pub use error::{DispatchError, IntakeError};
pub use request_queue::RequestQueue;
pub use simulation::{Simulation, SimulationHandle};
pub use watcher::{WatchOutcome, Watcher};
