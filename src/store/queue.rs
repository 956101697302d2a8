//! Deferred write queue.
//!
//! Writes accepted by the registry are not applied in-line. They are queued here and applied
//! in FIFO order when the host reaches a safe point and calls [WriteQueue::flush]. Until
//! then a read through the adapter still returns the old value.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::logutil::escape_log;
use crate::store::adapter::PropertyAdapter;
use crate::store::value::StoreValue;

#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    /// Replace the value. Already type-checked by the registry.
    Set { name: String, value: StoreValue },
    /// Add one to the persisted number, read at flush time. Non-numbers are left alone.
    Increment { name: String },
}

impl PendingWrite {
    pub fn name(&self) -> &str {
        match self {
            PendingWrite::Set { name, .. } | PendingWrite::Increment { name } => name,
        }
    }
}

/// Outcome counters for a single flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct WriteQueue {
    pending: VecDeque<PendingWrite>,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: PendingWrite) {
        debug!("queued write for '{}'", escape_log(write.name()));
        self.pending.push_back(write);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every queued write without applying it.
    pub fn discard(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Apply queued writes in order. Adapter failures are logged and the write is dropped;
    /// nothing is retried.
    pub fn flush<A: PropertyAdapter + ?Sized>(&mut self, adapter: &A) -> FlushReport {
        let mut report = FlushReport::default();
        while let Some(write) = self.pending.pop_front() {
            match write {
                PendingWrite::Set { name, value } => match adapter.set(&name, &value) {
                    Ok(()) => report.applied += 1,
                    Err(e) => {
                        warn!("dropping write to '{}': {}", escape_log(&name), e);
                        report.failed += 1;
                    }
                },
                PendingWrite::Increment { name } => {
                    let current = match adapter.get(&name) {
                        Ok(v) => v,
                        Err(e) => {
                            warn!("dropping increment of '{}': {}", escape_log(&name), e);
                            report.failed += 1;
                            continue;
                        }
                    };
                    let Some(n) = current.as_ref().and_then(StoreValue::as_number) else {
                        debug!("increment of '{}' skipped: not a number", escape_log(&name));
                        report.skipped += 1;
                        continue;
                    };
                    match adapter.set(&name, &StoreValue::Number(n + 1.0)) {
                        Ok(()) => report.applied += 1,
                        Err(e) => {
                            warn!("dropping increment of '{}': {}", escape_log(&name), e);
                            report.failed += 1;
                        }
                    }
                }
            }
        }
        report
    }
}
