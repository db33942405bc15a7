/// ----- WATCHER -----
/// Reports when a car reaches a given floor. The watcher only reads the
/// car's position, once per time unit, and stops on its own as soon as the
/// floor is reached. Dropping the watcher, cancelling it, or shutting the
/// simulation down ends it early.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use log::{debug, info};

use shared_resources::{ElevatorId, Floor};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Reached { elevator: ElevatorId, floor: Floor },
    Cancelled,
}

#[derive(Debug)]
pub struct Watcher {
    elevator: ElevatorId,
    floor: Floor,
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<WatchOutcome>>,
}

impl Watcher {
    pub fn elevator(&self) -> ElevatorId {
        self.elevator
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Waits for the watcher to finish.
    pub fn join(mut self) -> WatchOutcome {
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or(WatchOutcome::Cancelled),
            None => WatchOutcome::Cancelled,
        }
    }

    /// Stops watching. Returns `Reached` if the car got there first.
    pub fn cancel(mut self) -> WatchOutcome {
        self.cancel_tx.take();
        self.join()
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        // Disconnecting the cancel channel stops a watcher that is still polling.
        self.cancel_tx.take();
    }
}

/// Starts watching `elevator` until it stands on `floor`. The watcher also
/// ends when `shutdown_rx` is disconnected or receives a message.
pub fn watch(
    dispatcher: Arc<Dispatcher>,
    elevator: ElevatorId,
    floor: Floor,
    time_unit: Duration,
    shutdown_rx: Receiver<()>,
) -> Result<Watcher, DispatchError> {
    dispatcher.current_floor(elevator)?;
    let total_floors = dispatcher.total_floors();
    if !(0..total_floors).contains(&floor) {
        return Err(DispatchError::FloorOutOfRange { floor, total_floors });
    }

    let (cancel_tx, cancel_rx) = bounded::<()>(0);
    let name = format!("watch-{}-{}", elevator, floor);
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(move || poll(&dispatcher, elevator, floor, time_unit, &shutdown_rx, &cancel_rx))
        .map_err(|source| DispatchError::Spawn { name, source })?;

    Ok(Watcher {
        elevator,
        floor,
        cancel_tx: Some(cancel_tx),
        handle: Some(handle),
    })
}

fn poll(
    dispatcher: &Dispatcher,
    elevator: ElevatorId,
    floor: Floor,
    time_unit: Duration,
    shutdown_rx: &Receiver<()>,
    cancel_rx: &Receiver<()>,
) -> WatchOutcome {
    let timer = tick(time_unit);
    loop {
        if matches!(dispatcher.current_floor(elevator), Ok(current) if current == floor) {
            info!("Elevator {} reached destination floor {}", elevator, floor);
            return WatchOutcome::Reached { elevator, floor };
        }
        select! {
            recv(shutdown_rx) -> _ => break,
            recv(cancel_rx) -> _ => break,
            recv(timer) -> _ => {},
        }
    }
    debug!("Stopped watching elevator {} for floor {}", elevator, floor);
    WatchOutcome::Cancelled
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use shared_resources::config::Config;

    use super::*;

    const UNIT: Duration = Duration::from_millis(5);

    fn dispatcher() -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(&Config::default()))
    }

    #[test]
    fn already_there_reports_immediately() {
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let watcher = watch(dispatcher(), 0, 0, UNIT, shutdown_rx).unwrap();
        assert_eq!(watcher.join(), WatchOutcome::Reached { elevator: 0, floor: 0 });
    }

    #[test]
    fn reports_once_car_arrives() {
        let dispatcher = dispatcher();
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(0);
        dispatcher.submit(0, vec![2], 1).unwrap();
        dispatcher.try_dispatch_next().unwrap();

        let watcher = watch(Arc::clone(&dispatcher), 0, 2, UNIT, shutdown_rx).unwrap();
        assert!(!watcher.is_finished());
        dispatcher.step();
        dispatcher.step();
        assert_eq!(watcher.join(), WatchOutcome::Reached { elevator: 0, floor: 2 });
    }

    #[test]
    fn cancel_stops_watching() {
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let watcher = watch(dispatcher(), 1, 7, UNIT, shutdown_rx).unwrap();
        assert_eq!(watcher.cancel(), WatchOutcome::Cancelled);
    }

    #[test]
    fn shutdown_stops_watching() {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let watcher = watch(dispatcher(), 2, 5, UNIT, shutdown_rx).unwrap();
        let started = Instant::now();
        drop(shutdown_tx);
        assert_eq!(watcher.join(), WatchOutcome::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn unknown_elevator_is_rejected() {
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let result = watch(dispatcher(), 9, 1, UNIT, shutdown_rx);
        assert!(matches!(result, Err(DispatchError::UnknownElevator(9))));
    }

    #[test]
    fn floor_outside_building_is_rejected() {
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let result = watch(dispatcher(), 0, 10, UNIT, shutdown_rx);
        assert!(matches!(result, Err(DispatchError::FloorOutOfRange { floor: 10, .. })));
    }
}
