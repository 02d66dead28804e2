//! Plan lifecycle events and the synchronous bus that delivers them.
//!
//! Every mutating planner call emits zero or more [`PlanEvent`]s. The planner
//! queues them on the [`EventBus`] while it still holds its state lock, so
//! the queue is in commit order, then flushes after releasing the lock.
//! Listeners run with no planner lock held and may call back into the
//! planner. Events raised from inside a listener are queued behind the ones
//! still being delivered. When several threads commit at once, whichever
//! thread is already flushing delivers the events of the others.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Events emitted at plan and step lifecycle points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlanEvent {
    PlanCreated {
        plan_id: u64,
        goal: String,
        timestamp: Timestamp,
    },
    PlanApproved {
        plan_id: u64,
        timestamp: Timestamp,
    },
    PlanStarted {
        plan_id: u64,
        timestamp: Timestamp,
    },
    PlanCompleted {
        plan_id: u64,
        timestamp: Timestamp,
    },
    /// The plan stopped because `step_id` failed.
    PlanFailed {
        plan_id: u64,
        step_id: String,
        error: String,
        timestamp: Timestamp,
    },
    PlanCancelled {
        plan_id: u64,
        timestamp: Timestamp,
    },
    StepStarted {
        plan_id: u64,
        step_id: String,
        timestamp: Timestamp,
    },
    StepCompleted {
        plan_id: u64,
        step_id: String,
        output: Option<String>,
        timestamp: Timestamp,
    },
    StepFailed {
        plan_id: u64,
        step_id: String,
        error: String,
        timestamp: Timestamp,
    },
    StepSkipped {
        plan_id: u64,
        step_id: String,
        timestamp: Timestamp,
    },
    StepAdded {
        plan_id: u64,
        step_id: String,
        timestamp: Timestamp,
    },
    StepRemoved {
        plan_id: u64,
        step_id: String,
        timestamp: Timestamp,
    },
}

impl PlanEvent {
    /// Stable name of the event kind.
    pub fn event_type(&self) -> &'static str {
        match self {
            PlanEvent::PlanCreated { .. } => "plan_created",
            PlanEvent::PlanApproved { .. } => "plan_approved",
            PlanEvent::PlanStarted { .. } => "plan_started",
            PlanEvent::PlanCompleted { .. } => "plan_completed",
            PlanEvent::PlanFailed { .. } => "plan_failed",
            PlanEvent::PlanCancelled { .. } => "plan_cancelled",
            PlanEvent::StepStarted { .. } => "step_started",
            PlanEvent::StepCompleted { .. } => "step_completed",
            PlanEvent::StepFailed { .. } => "step_failed",
            PlanEvent::StepSkipped { .. } => "step_skipped",
            PlanEvent::StepAdded { .. } => "step_added",
            PlanEvent::StepRemoved { .. } => "step_removed",
        }
    }

    /// The plan the event belongs to.
    pub fn plan_id(&self) -> u64 {
        match self {
            PlanEvent::PlanCreated { plan_id, .. }
            | PlanEvent::PlanApproved { plan_id, .. }
            | PlanEvent::PlanStarted { plan_id, .. }
            | PlanEvent::PlanCompleted { plan_id, .. }
            | PlanEvent::PlanFailed { plan_id, .. }
            | PlanEvent::PlanCancelled { plan_id, .. }
            | PlanEvent::StepStarted { plan_id, .. }
            | PlanEvent::StepCompleted { plan_id, .. }
            | PlanEvent::StepFailed { plan_id, .. }
            | PlanEvent::StepSkipped { plan_id, .. }
            | PlanEvent::StepAdded { plan_id, .. }
            | PlanEvent::StepRemoved { plan_id, .. } => *plan_id,
        }
    }

    /// The step the event is about, if any.
    pub fn step_id(&self) -> Option<&str> {
        match self {
            PlanEvent::PlanFailed { step_id, .. }
            | PlanEvent::StepStarted { step_id, .. }
            | PlanEvent::StepCompleted { step_id, .. }
            | PlanEvent::StepFailed { step_id, .. }
            | PlanEvent::StepSkipped { step_id, .. }
            | PlanEvent::StepAdded { step_id, .. }
            | PlanEvent::StepRemoved { step_id, .. } => Some(step_id),
            PlanEvent::PlanCreated { .. }
            | PlanEvent::PlanApproved { .. }
            | PlanEvent::PlanStarted { .. }
            | PlanEvent::PlanCompleted { .. }
            | PlanEvent::PlanCancelled { .. } => None,
        }
    }
}

/// Handle returned by [`EventBus::add_listener`], used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&PlanEvent) + Send + Sync>;

/// Events waiting for delivery, and whether some thread is delivering them.
#[derive(Default)]
struct Outbox {
    pending: VecDeque<PlanEvent>,
    flushing: bool,
}

/// Registry of synchronous event listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    outbox: Mutex<Outbox>,
    next_id: AtomicU64,
}

/// Clears the flushing flag if a listener panics mid-flush.
struct FlushGuard<'a> {
    bus: &'a EventBus,
    finished: bool,
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.bus.outbox().flushing = false;
        }
    }
}

impl EventBus {
    /// Create an event bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives every event emitted from now on.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&PlanEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(listener)));
        log::debug!("registered event listener {id:?}");
        id
    }

    /// Unregister a listener. Returns whether it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    /// Queue events for delivery without running any listener.
    pub fn enqueue(&self, events: impl IntoIterator<Item = PlanEvent>) {
        self.outbox().pending.extend(events);
    }

    /// Deliver queued events, in order, until the queue is empty.
    ///
    /// Returns at once if a flush is already running, on this thread or
    /// another; that flush picks up whatever was queued.
    pub fn flush(&self) {
        {
            let mut outbox = self.outbox();
            if outbox.flushing {
                return;
            }
            outbox.flushing = true;
        }
        let mut guard = FlushGuard {
            bus: self,
            finished: false,
        };

        loop {
            let event = {
                let mut outbox = self.outbox();
                let Some(event) = outbox.pending.pop_front() else {
                    outbox.flushing = false;
                    guard.finished = true;
                    return;
                };
                event
            };

            // Snapshot so listeners may (un)register others without deadlocking.
            let listeners: Vec<Listener> =
                self.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
            log::debug!(
                "dispatching {} for plan {} to {} listener(s)",
                event.event_type(),
                event.plan_id(),
                listeners.len()
            );
            for listener in &listeners {
                listener(&event);
            }
        }
    }

    /// Queue events and deliver them.
    pub fn dispatch(&self, events: &[PlanEvent]) {
        self.enqueue(events.iter().cloned());
        self.flush();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
