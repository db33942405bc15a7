use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};

use dispatcher::intake;
use dispatcher::{Assignment, Dispatcher, Simulation, WatchOutcome};
use shared_resources::config::Config;
use shared_resources::{Direction, ElevatorStatus};

const UNIT: Duration = Duration::from_millis(5);
const TIMEOUT: Duration = Duration::from_secs(5);

fn config(num_elevators: usize, capacity: u32) -> Config {
    let mut config = Config::default();
    config.fleet.num_elevators = num_elevators;
    config.fleet.capacity = capacity;
    config.simulation.time_unit_ms = UNIT.as_millis() as u64;
    config
}

fn wait_for<F>(status_rx: &Receiver<Vec<ElevatorStatus>>, mut done: F) -> Vec<ElevatorStatus>
where
    F: FnMut(&[ElevatorStatus]) -> bool,
{
    let deadline = Instant::now() + TIMEOUT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let fleet = status_rx.recv_timeout(remaining).expect("fleet never reached expected state");
        if done(&fleet) {
            return fleet;
        }
    }
}

#[test]
fn single_ride_is_delivered() {
    let dispatcher = Arc::new(Dispatcher::new(&config(3, 10)));
    let (assignment_tx, assignment_rx) = unbounded();
    let (status_tx, status_rx) = unbounded();
    let simulation = Simulation::new(Arc::clone(&dispatcher), UNIT)
        .with_assignment_reports(assignment_tx)
        .with_status_reports(status_tx)
        .start()
        .unwrap();

    let watcher = simulation.watch(0, 2).unwrap();
    dispatcher.submit(0, vec![2], 1).unwrap();

    let assignment = assignment_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(assignment.elevator(), Some(0));
    assert!(assignment.is_assigned());

    assert_eq!(watcher.join(), WatchOutcome::Reached { elevator: 0, floor: 2 });

    let fleet = wait_for(&status_rx, |fleet| {
        fleet[0].current_floor == 2 && fleet[0].destination_floors.is_empty()
    });
    assert_eq!(fleet[0].direction, Direction::Idle);
    assert_eq!(fleet[0].current_load, 1);
    assert!(fleet[1..].iter().all(|car| car.current_floor == 0));

    simulation.shutdown();
}

#[test]
fn overflow_is_reported_not_assigned() {
    let dispatcher = Arc::new(Dispatcher::new(&config(1, 2)));
    let (assignment_tx, assignment_rx) = unbounded();
    let simulation = Simulation::new(Arc::clone(&dispatcher), UNIT)
        .with_assignment_reports(assignment_tx)
        .start()
        .unwrap();

    dispatcher.submit(0, vec![4], 2).unwrap();
    dispatcher.submit(0, vec![6], 1).unwrap();

    let outcomes: Vec<Assignment> = (0..2)
        .map(|_| assignment_rx.recv_timeout(TIMEOUT).unwrap())
        .collect();
    assert_eq!(outcomes.iter().filter(|a| a.is_assigned()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|a| matches!(a, Assignment::Unassigned { .. })));

    let status = dispatcher.elevator_status(0).unwrap();
    assert!(status.current_load <= status.capacity);

    simulation.shutdown();
}

#[test]
fn concurrent_submissions_are_all_dispatched() {
    let dispatcher = Arc::new(Dispatcher::new(&config(3, 100)));
    let (assignment_tx, assignment_rx) = unbounded();
    let simulation = Simulation::new(Arc::clone(&dispatcher), UNIT)
        .with_assignment_reports(assignment_tx)
        .start()
        .unwrap();

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..10 {
                    dispatcher.submit((p + i) % 10, vec![(p * 3 + i) % 10], 1).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    for _ in 0..40 {
        let assignment = assignment_rx.recv_timeout(TIMEOUT).unwrap();
        assert!(assignment.is_assigned());
    }

    let total_load: u32 = dispatcher.status().iter().map(|car| car.current_load).sum();
    assert_eq!(total_load, 40);

    simulation.shutdown();
}

#[test]
fn maintenance_car_is_passed_over() {
    let dispatcher = Arc::new(Dispatcher::new(&config(2, 10)));
    let (assignment_tx, assignment_rx) = unbounded();
    let simulation = Simulation::new(Arc::clone(&dispatcher), UNIT)
        .with_assignment_reports(assignment_tx)
        .start()
        .unwrap();

    intake::handle_line(&dispatcher, "maintenance 0 on").unwrap();
    intake::handle_line(&dispatcher, r#"{"current_floor": 0, "destination_floors": [3]}"#).unwrap();

    let assignment = assignment_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(assignment.elevator(), Some(1));

    simulation.shutdown();
}

#[test]
fn shutdown_ends_pending_watchers() {
    let dispatcher = Arc::new(Dispatcher::new(&config(3, 10)));
    let simulation = Simulation::new(dispatcher, UNIT).start().unwrap();

    let watcher = simulation.watch(1, 9).unwrap();
    let started = Instant::now();
    simulation.shutdown();

    assert_eq!(watcher.join(), WatchOutcome::Cancelled);
    assert!(started.elapsed() < TIMEOUT);
}

#[test]
fn dropping_the_handle_stops_the_clock() {
    let dispatcher = Arc::new(Dispatcher::new(&config(3, 10)));
    let (status_tx, status_rx) = unbounded();
    let simulation = Simulation::new(Arc::clone(&dispatcher), UNIT)
        .with_status_reports(status_tx)
        .start()
        .unwrap();
    status_rx.recv_timeout(TIMEOUT).unwrap();

    drop(simulation);
    // The clock thread owned the only sender.
    while status_rx.recv_timeout(TIMEOUT).is_ok() {}
    assert!(status_rx.is_empty());
    assert!(dispatcher.submit(0, vec![1], 1).is_ok());
    assert_eq!(dispatcher.pending_requests(), 0);
}
