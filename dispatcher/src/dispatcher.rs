/// ----- DISPATCHER -----
/// Owns the fleet and the queue of pending requests. Intake pushes validated
/// requests onto the queue, the dispatch loop pops them and picks a car for
/// each, and the simulation loop moves every car one tick at a time.
///
/// Each car sits behind its own lock, so moving one car never waits on
/// another and a status read never sees a half-updated car.

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use parking_lot::Mutex;

use car::Elevator;
use shared_resources::config::Config;
use shared_resources::{ElevatorId, ElevatorStatus, Floor, Request, RequestError};

use crate::error::DispatchError;
use crate::request_queue::RequestQueue;

/// What happened to a request once the dispatch loop got to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The car accepted the request.
    Assigned { elevator: ElevatorId, request: Request },
    /// No car in service had room for the group. The request is dropped.
    Unassigned { request: Request },
    /// The chosen car filled up before it could take the request. The
    /// request is dropped.
    Rejected { elevator: ElevatorId, request: Request },
}

impl Assignment {
    pub fn request(&self) -> &Request {
        match self {
            Assignment::Assigned { request, .. }
            | Assignment::Unassigned { request }
            | Assignment::Rejected { request, .. } => request,
        }
    }

    pub fn elevator(&self) -> Option<ElevatorId> {
        match self {
            Assignment::Assigned { elevator, .. } | Assignment::Rejected { elevator, .. } => {
                Some(*elevator)
            }
            Assignment::Unassigned { .. } => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Assignment::Assigned { .. })
    }
}

/// A stop reached during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub elevator: ElevatorId,
    pub floor: Floor,
}

#[derive(Debug)]
pub struct Dispatcher {
    elevators: Vec<Mutex<Elevator>>,
    total_floors: Floor,
    queue: RequestQueue,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        let fleet = &config.fleet;
        let elevators = (0..fleet.num_elevators)
            .map(|id| {
                Mutex::new(Elevator::new(
                    id,
                    fleet.total_floors,
                    fleet.capacity_of(id),
                    config.simulation.door_dwell_ticks,
                ))
            })
            .collect();

        Dispatcher {
            elevators,
            total_floors: fleet.total_floors,
            queue: RequestQueue::new(),
        }
    }

    pub fn total_floors(&self) -> Floor {
        self.total_floors
    }

    pub fn num_elevators(&self) -> usize {
        self.elevators.len()
    }

    /// Validates a ride against the building and queues it for dispatch.
    /// Nothing is queued when validation fails.
    pub fn submit(
        &self,
        current_floor: Floor,
        destination_floors: Vec<Floor>,
        num_people: u32,
    ) -> Result<(), RequestError> {
        let request = Request::new(current_floor, destination_floors, self.total_floors, num_people)?;
        self.request_elevator(request);
        Ok(())
    }

    pub fn request_elevator(&self, request: Request) {
        debug!(
            "Queued request from floor {} to {:?} for {} people",
            request.current_floor(),
            request.destination_floors(),
            request.num_people()
        );
        if !self.queue.push(request) {
            warn!("Request queue is closed, dropping request");
        }
    }

    pub fn pending_requests(&self) -> usize {
        self.queue.len()
    }

    /// Picks the car best suited for `request`, or `None` if no car in
    /// service has room for the group.
    ///
    /// Cars idle or already heading the request's way are ranked by floor
    /// distance plus pending stops. If none of those has room, any car in
    /// service with room is taken, fewest pending stops first. Ties go to
    /// the lower car id.
    pub fn find_best_elevator(&self, request: &Request) -> Option<ElevatorId> {
        let fleet = self.status();
        select_elevator(&fleet, request)
    }

    /// Selects a car for `request` and hands the request to it.
    pub fn assign(&self, request: Request) -> Assignment {
        let Some(id) = self.find_best_elevator(&request) else {
            warn!(
                "No elevator available for request from floor {} with {} people, dropping it",
                request.current_floor(),
                request.num_people()
            );
            return Assignment::Unassigned { request };
        };
        self.assign_to(id, request)
    }

    /// Hands `request` to car `id`. Selection works on a snapshot, so the
    /// car may have filled up since; the request is then rejected and the
    /// car left as it was.
    fn assign_to(&self, id: ElevatorId, request: Request) -> Assignment {
        let Some(elevator) = self.elevators.get(id) else {
            warn!("Elevator {} does not exist, dropping request", id);
            return Assignment::Unassigned { request };
        };

        if elevator.lock().add_request(&request) {
            debug!("Assigned request from floor {} to elevator {}", request.current_floor(), id);
            Assignment::Assigned { elevator: id, request }
        } else {
            warn!("Elevator {} is at full capacity.", id);
            Assignment::Rejected { elevator: id, request }
        }
    }

    /// Waits for the next pending request and dispatches it. Returns `None`
    /// once the queue has been closed.
    pub fn dispatch_next(&self) -> Option<Assignment> {
        self.queue.pop().map(|request| self.assign(request))
    }

    /// Dispatches the next pending request if there is one, without waiting.
    pub fn try_dispatch_next(&self) -> Option<Assignment> {
        self.queue.try_pop().map(|request| self.assign(request))
    }

    /// Dispatch loop. Runs until the queue is closed, reporting every
    /// outcome on `outcomes` if given.
    pub fn handle_requests(&self, outcomes: Option<&Sender<Assignment>>) {
        info!("Dispatch loop started");
        while let Some(assignment) = self.dispatch_next() {
            if let Some(tx) = outcomes {
                // A monitor that went away must not stop dispatching.
                let _ = tx.send(assignment);
            }
        }
        info!("Dispatch loop stopped");
    }

    /// Moves every car by one time unit.
    pub fn step(&self) -> Vec<Arrival> {
        self.elevators
            .iter()
            .filter_map(|elevator| {
                let mut elevator = elevator.lock();
                elevator.step().map(|floor| Arrival {
                    elevator: elevator.id(),
                    floor,
                })
            })
            .collect()
    }

    pub fn status(&self) -> Vec<ElevatorStatus> {
        self.elevators
            .iter()
            .map(|elevator| elevator.lock().status())
            .collect()
    }

    pub fn elevator_status(&self, id: ElevatorId) -> Result<ElevatorStatus, DispatchError> {
        self.elevators
            .get(id)
            .map(|elevator| elevator.lock().status())
            .ok_or(DispatchError::UnknownElevator(id))
    }

    pub fn current_floor(&self, id: ElevatorId) -> Result<Floor, DispatchError> {
        self.elevators
            .get(id)
            .map(|elevator| elevator.lock().current_floor())
            .ok_or(DispatchError::UnknownElevator(id))
    }

    /// Takes a car out of service or puts it back. A car in maintenance gets
    /// no new requests but still serves the stops it already has.
    pub fn set_maintenance(&self, id: ElevatorId, maintenance: bool) -> Result<(), DispatchError> {
        let elevator = self.elevators.get(id).ok_or(DispatchError::UnknownElevator(id))?;
        elevator.lock().set_maintenance(maintenance);
        info!(
            "Elevator {} {} maintenance",
            id,
            if maintenance { "entered" } else { "left" }
        );
        Ok(())
    }

    /// Closes the request queue. The dispatch loop finishes and requests
    /// still waiting are dropped.
    pub fn close(&self) {
        let dropped = self.queue.close();
        if dropped > 0 {
            warn!("Dropped {} pending requests on shutdown", dropped);
        }
    }
}

fn select_elevator(fleet: &[ElevatorStatus], request: &Request) -> Option<ElevatorId> {
    let num_people = request.num_people();

    let best = fleet
        .iter()
        .filter(|car| !car.maintenance)
        .filter(|car| car.direction.is_idle() || car.direction == request.direction())
        .filter(|car| car.has_capacity_for(num_people))
        .map(|car| {
            let distance = (car.current_floor - request.current_floor()).unsigned_abs() as usize;
            (car.id, distance + car.pending_stops())
        })
        // min_by_key keeps the first of equal minimums
        .min_by_key(|&(_, cost)| cost)
        .map(|(id, _)| id);

    best.or_else(|| {
        fleet
            .iter()
            .filter(|car| !car.maintenance && car.has_capacity_for(num_people))
            .min_by_key(|car| car.pending_stops())
            .map(|car| car.id)
    })
}
