/// ----- SIMULATION -----
/// Runs the dispatch loop and the clock that moves the fleet, each on its
/// own thread. Both stop when the handle is shut down or dropped.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use log::{debug, error, info, log_enabled, Level};

use shared_resources::{ElevatorId, ElevatorStatus, Floor};

use crate::dispatcher::{Assignment, Dispatcher};
use crate::error::DispatchError;
use crate::watcher::{self, Watcher};

pub struct Simulation {
    dispatcher: Arc<Dispatcher>,
    time_unit: Duration,
    assignment_tx: Option<Sender<Assignment>>,
    status_tx: Option<Sender<Vec<ElevatorStatus>>>,
}

impl Simulation {
    pub fn new(dispatcher: Arc<Dispatcher>, time_unit: Duration) -> Self {
        Simulation {
            dispatcher,
            time_unit,
            assignment_tx: None,
            status_tx: None,
        }
    }

    /// Report the outcome of every dispatched request on `tx`.
    pub fn with_assignment_reports(mut self, tx: Sender<Assignment>) -> Self {
        self.assignment_tx = Some(tx);
        self
    }

    /// Send the fleet status after every step on `tx`.
    pub fn with_status_reports(mut self, tx: Sender<Vec<ElevatorStatus>>) -> Self {
        self.status_tx = Some(tx);
        self
    }

    pub fn start(self) -> Result<SimulationHandle, DispatchError> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let mut handle = SimulationHandle {
            dispatcher: Arc::clone(&self.dispatcher),
            time_unit: self.time_unit,
            shutdown_tx: Some(shutdown_tx),
            shutdown_rx: shutdown_rx.clone(),
            threads: Vec::new(),
        };

        {
            let dispatcher = Arc::clone(&self.dispatcher);
            let assignment_tx = self.assignment_tx;
            handle.spawn("dispatch", move || {
                dispatcher.handle_requests(assignment_tx.as_ref())
            })?;
        }

        {
            let dispatcher = Arc::clone(&self.dispatcher);
            let status_tx = self.status_tx;
            let time_unit = self.time_unit;
            handle.spawn("simulation", move || {
                run_clock(&dispatcher, time_unit, &shutdown_rx, status_tx.as_ref())
            })?;
        }

        Ok(handle)
    }
}

/// Owns the running simulation threads.
pub struct SimulationHandle {
    dispatcher: Arc<Dispatcher>,
    time_unit: Duration,
    shutdown_tx: Option<Sender<()>>,
    shutdown_rx: Receiver<()>,
    threads: Vec<JoinHandle<()>>,
}

impl SimulationHandle {
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn time_unit(&self) -> Duration {
        self.time_unit
    }

    /// Starts a watcher that ends with the simulation at the latest.
    pub fn watch(&self, elevator: ElevatorId, floor: Floor) -> Result<Watcher, DispatchError> {
        watcher::watch(
            Arc::clone(&self.dispatcher),
            elevator,
            floor,
            self.time_unit,
            self.shutdown_rx.clone(),
        )
    }

    /// Stops both loops and waits for them to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn spawn<F>(&mut self, name: &str, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(f)
            .map_err(|source| DispatchError::Spawn {
                name: name.to_string(),
                source,
            })?;
        self.threads.push(thread);
        Ok(())
    }

    fn stop(&mut self) {
        if self.shutdown_tx.take().is_none() {
            return;
        }
        self.dispatcher.close();
        for thread in self.threads.drain(..) {
            let name = thread.thread().name().unwrap_or("unnamed").to_string();
            if thread.join().is_err() {
                error!("{} thread panicked", name);
            }
        }
        info!("Simulation stopped");
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_clock(
    dispatcher: &Dispatcher,
    time_unit: Duration,
    shutdown_rx: &Receiver<()>,
    status_tx: Option<&Sender<Vec<ElevatorStatus>>>,
) {
    info!("Simulation loop started, one step every {:?}", time_unit);
    let timer = tick(time_unit);

    // The first step is taken right away, the rest once per time unit.
    advance(dispatcher, status_tx);
    loop {
        select! {
            recv(shutdown_rx) -> _ => break,
            recv(timer) -> _ => advance(dispatcher, status_tx),
        }
    }
    info!("Simulation loop stopped");
}

fn advance(dispatcher: &Dispatcher, status_tx: Option<&Sender<Vec<ElevatorStatus>>>) {
    for arrival in dispatcher.step() {
        debug!("Elevator {} stopped at floor {}", arrival.elevator, arrival.floor);
    }
    let status = dispatcher.status();
    if log_enabled!(Level::Debug) {
        debug!("Elevator Status: {}", serde_json::to_string(&status).unwrap_or_default());
    }
    if let Some(tx) = status_tx {
        let _ = tx.send(status);
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use shared_resources::config::Config;

    use super::*;

    #[test]
    fn shutdown_joins_idle_loops() {
        let dispatcher = Arc::new(Dispatcher::new(&Config::default()));
        let handle = Simulation::new(Arc::clone(&dispatcher), Duration::from_millis(5))
            .start()
            .unwrap();
        handle.shutdown();
        assert!(dispatcher.submit(0, vec![1], 1).is_ok());
        assert_eq!(dispatcher.pending_requests(), 0);
    }

    #[test]
    fn status_reported_every_step() {
        let dispatcher = Arc::new(Dispatcher::new(&Config::default()));
        let (status_tx, status_rx) = unbounded();
        let handle = Simulation::new(dispatcher, Duration::from_millis(5))
            .with_status_reports(status_tx)
            .start()
            .unwrap();

        let status = status_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(status.len(), 3);
        drop(handle);
    }

    #[test]
    fn first_step_is_taken_at_start() {
        let dispatcher = Arc::new(Dispatcher::new(&Config::default()));
        dispatcher.assign(shared_resources::Request::new(0, vec![4], 10, 1).unwrap());
        let (status_tx, status_rx) = unbounded();
        // Long enough that only the immediate step can land within the test.
        let handle = Simulation::new(Arc::clone(&dispatcher), Duration::from_secs(60))
            .with_status_reports(status_tx)
            .start()
            .unwrap();

        let status = status_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(status[0].current_floor, 1);
        assert_eq!(handle.time_unit(), Duration::from_secs(60));
        assert_eq!(handle.dispatcher().current_floor(0).unwrap(), 1);
        handle.shutdown();
    }
}
