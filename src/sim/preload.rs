//! Asset preload gate
//!
//! Counts load settlements (success or failure) and raises a one-shot ready
//! signal once every requested asset has settled. Failures still count, so the
//! experience always gets past loading.

use serde::{Deserialize, Serialize};

/// Terminal result of one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadOutcome {
    Succeeded,
    Failed,
}

/// One requested asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTask {
    pub reference: String,
    pub outcome: Option<LoadOutcome>,
}

/// Completion latch over a fixed set of load tasks
#[derive(Debug, Clone)]
pub struct PreloadGate {
    tasks: Vec<LoadTask>,
    observed: usize,
    ready: bool,
    /// Ready signal waiting to be taken by the next tick
    signal_pending: bool,
}

impl PreloadGate {
    /// Create a gate for the given references. Nothing fires from here;
    /// with no references the signal waits for the first [`take_ready_signal`](Self::take_ready_signal).
    pub fn new(references: Vec<String>) -> Self {
        let tasks: Vec<LoadTask> = references
            .into_iter()
            .map(|reference| LoadTask {
                reference,
                outcome: None,
            })
            .collect();
        let ready = tasks.is_empty();
        if ready {
            log::info!("Nothing to preload");
        }
        Self {
            tasks,
            observed: 0,
            ready,
            signal_pending: ready,
        }
    }

    /// Expected settlement count (M)
    pub fn expected(&self) -> usize {
        self.tasks.len()
    }

    /// Settlements seen so far
    pub fn observed(&self) -> usize {
        self.observed
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn tasks(&self) -> &[LoadTask] {
        &self.tasks
    }

    /// Number of failed loads so far
    pub fn failures(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.outcome == Some(LoadOutcome::Failed))
            .count()
    }

    /// Fraction of assets settled (1.0 when there is nothing to load)
    pub fn progress(&self) -> f32 {
        if self.tasks.is_empty() {
            1.0
        } else {
            self.observed as f32 / self.tasks.len() as f32
        }
    }

    /// Record a settlement. Returns true when this settlement completed the gate.
    ///
    /// Unknown ids and repeat settlements of the same task are ignored.
    pub fn settle(&mut self, id: usize, outcome: LoadOutcome) -> bool {
        let Some(task) = self.tasks.get_mut(id) else {
            log::debug!("Ignoring settlement for unknown asset #{}", id);
            return false;
        };
        if task.outcome.is_some() {
            log::debug!("Asset {} already settled", task.reference);
            return false;
        }
        task.outcome = Some(outcome);
        match outcome {
            LoadOutcome::Succeeded => log::debug!("Loaded {}", task.reference),
            LoadOutcome::Failed => log::warn!("Failed to load {}", task.reference),
        }

        self.observed += 1;
        if self.observed == self.tasks.len() && !self.ready {
            self.ready = true;
            self.signal_pending = true;
            log::info!(
                "All {} assets settled ({} failed)",
                self.observed,
                self.failures()
            );
            return true;
        }
        false
    }

    /// Take the ready signal. True exactly once over the gate's lifetime.
    pub fn take_ready_signal(&mut self) -> bool {
        std::mem::take(&mut self.signal_pending)
    }
}
