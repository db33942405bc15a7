use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use crossbeam_channel::unbounded;
use log::{info, warn, LevelFilter};

use dispatcher::intake;
use dispatcher::{debug, Assignment, Dispatcher, Simulation, WatchOutcome};
use shared_resources::config::Config;
use shared_resources::{ElevatorId, Floor};

#[derive(Debug, Parser)]
#[command(name = "elevator-sim", about = "Simulated elevator bank fed from stdin")]
struct Args {
    /// Configuration file. Defaults to config.json, then _config.json.
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long)]
    num_elevators: Option<usize>,

    #[arg(long)]
    total_floors: Option<Floor>,

    /// Length of one simulation step.
    #[arg(long)]
    time_unit_ms: Option<u64>,

    /// Report when a car reaches a floor, given as ID:FLOOR. Repeatable.
    #[arg(long, short, value_parser = parse_watch)]
    watch: Vec<(ElevatorId, Floor)>,

    /// Draw the fleet table after every step.
    #[arg(long, short, default_value_t = false)]
    display: bool,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn parse_watch(s: &str) -> Result<(ElevatorId, Floor), String> {
    let (id, floor) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:FLOOR, got {}", s))?;
    let id = id.parse().map_err(|e| format!("bad elevator id {:?}: {}", id, e))?;
    let floor = floor.parse().map_err(|e| format!("bad floor {:?}: {}", floor, e))?;
    Ok((id, floor))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    // READ CONFIGURATION
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(num_elevators) = args.num_elevators {
        config.fleet.num_elevators = num_elevators;
    }
    if let Some(total_floors) = args.total_floors {
        config.fleet.total_floors = total_floors;
    }
    if let Some(time_unit_ms) = args.time_unit_ms {
        config.simulation.time_unit_ms = time_unit_ms;
    }
    config.validate()?;
    info!(
        "Starting {} elevators over {} floors, one step every {} ms",
        config.fleet.num_elevators, config.fleet.total_floors, config.simulation.time_unit_ms
    );

    // INITIALIZE CHANNELS
    let (assignment_tx, assignment_rx) = unbounded::<Assignment>();
    let (status_tx, status_rx) = unbounded();

    // START SIMULATION
    let dispatcher = Arc::new(Dispatcher::new(&config));
    let mut simulation = Simulation::new(Arc::clone(&dispatcher), config.simulation.time_unit())
        .with_assignment_reports(assignment_tx);
    if args.display {
        simulation = simulation.with_status_reports(status_tx);
    } else {
        drop(status_tx);
    }
    let simulation = simulation.start()?;

    // INITIALIZE THREAD FOR ASSIGNMENT REPORTS
    let monitor = thread::Builder::new()
        .name("assignments".to_string())
        .spawn(move || {
            for assignment in assignment_rx.iter() {
                match assignment {
                    Assignment::Assigned { elevator, request } => info!(
                        "Elevator {} takes {} people from floor {} to {:?}",
                        elevator,
                        request.num_people(),
                        request.current_floor(),
                        request.destination_floors()
                    ),
                    Assignment::Unassigned { request } => warn!(
                        "Request from floor {} for {} people was not served",
                        request.current_floor(),
                        request.num_people()
                    ),
                    Assignment::Rejected { elevator, request } => warn!(
                        "Elevator {} refused request from floor {}",
                        elevator,
                        request.current_floor()
                    ),
                }
            }
        })?;

    // INITIALIZE THREAD FOR STATUS DISPLAY
    let display = if args.display {
        Some(
            thread::Builder::new()
                .name("display".to_string())
                .spawn(move || debug::main(status_rx))?,
        )
    } else {
        None
    };

    // START WATCHERS
    let watchers = args
        .watch
        .iter()
        .map(|&(elevator, floor)| simulation.watch(elevator, floor))
        .collect::<Result<Vec<_>, _>>()?;

    // READ REQUESTS UNTIL END OF INPUT
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Some(reply) = intake::handle_line(&dispatcher, &line) {
            writeln!(stdout, "{}", reply)?;
            stdout.flush()?;
        }
    }

    info!("End of input, shutting down");
    simulation.shutdown();

    for watcher in watchers {
        let (elevator, floor) = (watcher.elevator(), watcher.floor());
        if watcher.join() == WatchOutcome::Cancelled {
            info!("Elevator {} never reached floor {}", elevator, floor);
        }
    }
    if monitor.join().is_err() {
        warn!("Assignment monitor panicked");
    }
    if let Some(display) = display {
        match display.join() {
            Ok(result) => result?,
            Err(_) => warn!("Status display panicked"),
        }
    }
    Ok(())
}
