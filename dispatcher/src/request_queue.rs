use std::cmp::Ordering;
use std::collections::BinaryHeap;

use parking_lot::{Condvar, Mutex};

use shared_resources::Request;

/// Pending requests, smallest group first. Groups of the same size come out
/// in the order they were submitted.
///
/// `pop` blocks until a request is available or the queue is closed, so the
/// dispatch loop sleeps instead of spinning while nothing is waiting.
#[derive(Debug, Default)]
pub struct RequestQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

#[derive(Debug, Default)]
struct QueueState {
    heap: BinaryHeap<QueuedRequest>,
    next_seq: u64,
    closed: bool,
}

#[derive(Debug)]
struct QueuedRequest {
    num_people: u32,
    seq: u64,
    request: Request,
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.num_people == other.num_people && self.seq == other.seq
    }
}

impl Eq for QueuedRequest {}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap, so the comparison is reversed.
impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .num_people
            .cmp(&self.num_people)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request. Returns `false` if the queue has been closed, in
    /// which case the request is discarded.
    pub fn push(&self, request: Request) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.heap.push(QueuedRequest {
            num_people: request.num_people(),
            seq,
            request,
        });
        drop(state);
        self.available.notify_one();
        true
    }

    /// Waits for the next request. Returns `None` once the queue is closed.
    pub fn pop(&self) -> Option<Request> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(entry) = state.heap.pop() {
                return Some(entry.request);
            }
            self.available.wait(&mut state);
        }
    }

    pub fn try_pop(&self) -> Option<Request> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.heap.pop().map(|entry| entry.request)
    }

    /// Stops the queue: waiting and future `pop` calls return `None`, and
    /// anything still pending is dropped. Returns how many requests were
    /// pending.
    pub fn close(&self) -> usize {
        let mut state = self.state.lock();
        state.closed = true;
        let dropped = state.heap.len();
        state.heap.clear();
        drop(state);
        self.available.notify_all();
        dropped
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
