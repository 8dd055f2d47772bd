//! Per-run result table: one write-once publication slot per scheduled
//! module. Single writer, many readers; readers block until the slot fills.

use crate::cancel::CancelToken;
use crate::core::result::ModuleResult;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

struct Slot {
    cell: Mutex<Option<Arc<ModuleResult>>>,
    ready: Condvar,
}

impl Slot {
    fn new() -> Self {
        Self {
            cell: Mutex::new(None),
            ready: Condvar::new(),
        }
    }
}

/// Constructed fresh for every run with a slot per scheduled module and
/// discarded at run end. Publication is atomic and total: a reader either
/// sees nothing or the whole result.
pub struct ResultTable {
    slots: HashMap<String, Slot>,
}

impl ResultTable {
    pub fn new<I, S>(scheduled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = scheduled
            .into_iter()
            .map(|name| (name.into(), Slot::new()))
            .collect();
        Self { slots }
    }

    /// Whether a module is scheduled in this run, published or not.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Fill a slot. Write-once: the first publication wins and a duplicate
    /// is dropped with a warning.
    pub fn publish(&self, name: &str, result: ModuleResult) -> Arc<ModuleResult> {
        let Some(slot) = self.slots.get(name) else {
            warn!(module = name, "publish for unscheduled module dropped");
            return Arc::new(result);
        };
        let mut cell = slot.cell.lock();
        if let Some(existing) = cell.as_ref() {
            warn!(module = name, "duplicate publication dropped");
            return existing.clone();
        }
        let result = Arc::new(result);
        *cell = Some(result.clone());
        slot.ready.notify_all();
        result
    }

    /// Non-blocking read.
    pub fn get(&self, name: &str) -> Option<Arc<ModuleResult>> {
        self.slots.get(name).and_then(|slot| slot.cell.lock().clone())
    }

    /// Block until `name` is published, the deadline passes, or the run is
    /// cancelled. Returns `None` immediately for an unscheduled name; a
    /// dependency wait must never suspend on a module that will never run.
    pub fn wait(
        &self,
        name: &str,
        deadline: Instant,
        slice: Duration,
        cancel: &CancelToken,
    ) -> Option<Arc<ModuleResult>> {
        let slot = self.slots.get(name)?;
        let mut cell = slot.cell.lock();
        loop {
            if let Some(result) = cell.as_ref() {
                return Some(result.clone());
            }
            if cancel.is_cancelled() || Instant::now() >= deadline {
                return None;
            }
            let step = slice.min(deadline.saturating_duration_since(Instant::now()));
            slot.ready.wait_for(&mut cell, step);
        }
    }

    /// All published results. Meaningful once every worker has terminated.
    pub fn snapshot(&self) -> HashMap<String, Arc<ModuleResult>> {
        self.slots
            .iter()
            .filter_map(|(name, slot)| {
                slot.cell.lock().clone().map(|result| (name.clone(), result))
            })
            .collect()
    }
}
