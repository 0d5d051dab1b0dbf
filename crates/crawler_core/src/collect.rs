use std::collections::HashSet;

use crate::PostRecord;

/// Consecutive non-progress passes tolerated before the collection stops.
pub const STAGNATION_THRESHOLD: u32 = 3;

/// What to do with one enumerated feed item, decided from its text fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDisposition {
    /// Text was seen in an earlier pass (or earlier in this one); skip the item.
    Duplicate,
    /// First sighting; the fingerprint is now marked seen and extraction may run.
    AttemptExtraction,
}

/// Why a collection run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of records was accepted.
    TargetReached,
    /// No forward progress across enough consecutive passes.
    Stagnated,
}

/// Bookkeeping for one collection run: dedup set, accepted records and the
/// two stagnation signals. Owned by a single run and discarded at its end.
///
/// The two signals (no newly accepted items in a pass, no growth of the
/// scrollable extent after a scroll) are additive: either one can push the
/// counter to [`STAGNATION_THRESHOLD`]. Only a pass that accepts new records
/// resets the counter; extent growth alone does not.
#[derive(Debug, Clone)]
pub struct CollectState {
    target: usize,
    accepted: Vec<PostRecord>,
    seen: HashSet<String>,
    stagnation: u32,
    last_extent: f64,
    pass_new: usize,
}

impl CollectState {
    /// `target` is the caller-supplied number of records to collect (positive).
    pub fn new(target: usize) -> Self {
        Self {
            target,
            accepted: Vec::new(),
            seen: HashSet::new(),
            stagnation: 0,
            last_extent: 0.0,
            pass_new: 0,
        }
    }

    /// Starts a new enumerate pass, resetting the per-pass new-item counter.
    pub fn begin_pass(&mut self) {
        self.pass_new = 0;
    }

    /// Dedup gate for one item. Marks the fingerprint seen *before* any
    /// extraction is attempted, so a repeating text is visited at most once
    /// even when its extraction fails or is rejected.
    pub fn observe_text(&mut self, text: &str) -> ItemDisposition {
        if self.seen.contains(text) {
            ItemDisposition::Duplicate
        } else {
            self.seen.insert(text.to_string());
            ItemDisposition::AttemptExtraction
        }
    }

    /// Appends an accepted record. Callers must stop scanning the pass once
    /// [`CollectState::target_reached`] turns true.
    pub fn accept(&mut self, record: PostRecord) {
        debug_assert!(self.accepted.len() < self.target);
        self.accepted.push(record);
        self.pass_new += 1;
    }

    pub fn target_reached(&self) -> bool {
        self.accepted.len() >= self.target
    }

    /// Applies the per-pass stagnation signal: a pass with zero newly accepted
    /// items increments the counter, any progress resets it.
    pub fn finish_pass(&mut self) {
        if self.pass_new == 0 {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
        }
    }

    /// Applies the scroll-extent stagnation signal, measured after the scroll
    /// settle pause. An unchanged extent increments the counter on top of any
    /// per-pass increment from the same iteration.
    pub fn record_extent(&mut self, extent: f64) {
        if extent == self.last_extent {
            self.stagnation += 1;
        }
        self.last_extent = extent;
    }

    pub fn should_stop(&self) -> Option<StopReason> {
        if self.target_reached() {
            Some(StopReason::TargetReached)
        } else if self.stagnation >= STAGNATION_THRESHOLD {
            Some(StopReason::Stagnated)
        } else {
            None
        }
    }

    pub fn accepted(&self) -> &[PostRecord] {
        &self.accepted
    }

    pub fn accepted_len(&self) -> usize {
        self.accepted.len()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Consumes the state, yielding records in discovery order.
    pub fn into_records(self) -> Vec<PostRecord> {
        self.accepted
    }
}
