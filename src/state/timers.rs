//! Overlay Expiry Scheduler - wall-clock timers next to the tick clock.
//!
//! Every overlay a fold adds gets one pending expiry. When it comes due the
//! scheduler removes the overlay (by uid) from its coordinate's cache entry
//! and asks the cell that armed it to repaint, even though no tick passed.
//!
//! # Pattern
//!
//! - Single-threaded: due timers are drained by whoever observes the board
//!   (`Board::entry`, `Board::refresh`, `CellView::render`) or by the event loop
//!   (`Board::run_due_timers`), never by a background thread.
//! - Each pending expiry is popped exactly once, so it cannot fire twice.
//! - The owning cell is held weakly. If it was unmounted, the cache removal
//!   still happens and the repaint request is dropped.
//! - Time comes from an injected [`Clock`]; tests drive a [`ManualClock`].

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::engine::cache::RenderCache;
use crate::engine::object::VisualOverlay;
use crate::types::Coord;

// =============================================================================
// CLOCKS
// =============================================================================

/// Source of wall-clock time for overlay expiry.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

// =============================================================================
// REPAINT SEAM
// =============================================================================

/// Something that can be told its visible state changed out-of-band.
pub trait Repaint {
    fn request_repaint(&self);
}

// =============================================================================
// SCHEDULER
// =============================================================================

struct PendingExpiry {
    deadline: Instant,
    seq: u64,
    coord: Coord,
    uid: String,
    owner: Weak<dyn Repaint>,
}

impl PartialEq for PendingExpiry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for PendingExpiry {}

impl PartialOrd for PendingExpiry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingExpiry {
    // Reversed: BinaryHeap is a max-heap, earliest deadline must pop first.
    // Ties fire in arm order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending overlay expiries for one board session.
pub struct OverlayScheduler {
    clock: Rc<dyn Clock>,
    cache: RenderCache,
    queue: RefCell<BinaryHeap<PendingExpiry>>,
    next_seq: Cell<u64>,
}

impl OverlayScheduler {
    pub fn new(clock: Rc<dyn Clock>, cache: RenderCache) -> Self {
        Self {
            clock,
            cache,
            queue: RefCell::new(BinaryHeap::new()),
            next_seq: Cell::new(0),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Arm the expiry of `overlay`, which the caller has just appended to the
    /// cache entry at `coord`.
    ///
    /// A duration too long to represent as a deadline never expires; the
    /// overlay then stays until the entry is replaced. Returns whether an
    /// expiry was armed.
    pub fn arm(&self, coord: Coord, overlay: &VisualOverlay, owner: Weak<dyn Repaint>) -> bool {
        let Some(deadline) = self.clock.now().checked_add(overlay.duration()) else {
            tracing::debug!(
                coord = %coord,
                uid = overlay.uid(),
                class = overlay.class_name(),
                "overlay duration unrepresentable, not armed"
            );
            return false;
        };
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        tracing::trace!(
            coord = %coord,
            uid = overlay.uid(),
            class = overlay.class_name(),
            ms = overlay.duration().as_millis() as u64,
            "overlay armed"
        );
        self.queue.borrow_mut().push(PendingExpiry {
            deadline,
            seq,
            coord,
            uid: overlay.uid().to_string(),
            owner,
        });
        true
    }

    /// Fire every expiry whose deadline has passed. Returns how many fired.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        // Pop one at a time with the queue borrow released before firing, so
        // a repaint triggered here may observe the board again.
        while let Some(task) = self.pop_due(now) {
            self.fire(task);
            fired += 1;
        }
        fired
    }

    fn pop_due(&self, now: Instant) -> Option<PendingExpiry> {
        let mut queue = self.queue.borrow_mut();
        if queue.peek().is_some_and(|next| next.deadline <= now) {
            queue.pop()
        } else {
            None
        }
    }

    fn fire(&self, task: PendingExpiry) {
        let removed = self.cache.remove_overlay(task.coord, &task.uid);
        let owner = task.owner.upgrade();
        tracing::trace!(
            coord = %task.coord,
            uid = %task.uid,
            removed,
            mounted = owner.is_some(),
            "overlay expired"
        );
        if let Some(owner) = owner {
            owner.request_repaint();
        }
    }

    /// Earliest pending deadline, for event loops deciding how long to sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().peek().map(|next| next.deadline)
    }

    /// Time until the earliest pending deadline (zero if already due).
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl fmt::Debug for OverlayScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayScheduler")
            .field("pending", &self.pending())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
