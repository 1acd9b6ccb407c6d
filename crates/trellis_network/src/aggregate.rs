//! Aggregation nodes: count facts per group and emit a result fact the
//! first time a group reaches its threshold.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;
use trellis_foundation::{AggregateResult, Fact, SharedFact, Token};

use crate::memory::AlphaMemory;
use crate::node::{ChildSet, Node};

/// Extracts the grouping key from a fact, or `None` to skip it.
pub type GroupKeyFn = Box<dyn Fn(&dyn Fact) -> Option<String> + Send + Sync>;

/// Counts facts per group key over a right-hand fact stream.
///
/// The node has no left input; it aggregates facts directly, with no token
/// context. When a group's count first reaches the threshold, a synthetic
/// [`AggregateResult`] fact is asserted downstream.
///
/// Retraction is unsupported by design: counts are never decremented and
/// emitted results are never retracted, so the threshold crossing is
/// one-shot per group key for the lifetime of the node.
pub struct AggregateNode {
    group: GroupKeyFn,
    threshold: usize,
    memory: AlphaMemory,
    counts: Mutex<HashMap<String, usize>>,
    children: ChildSet,
}

impl AggregateNode {
    /// Creates an aggregation node with the given grouping function and
    /// threshold.
    pub fn new(
        group: impl Fn(&dyn Fact) -> Option<String> + Send + Sync + 'static,
        threshold: usize,
    ) -> Self {
        Self {
            group: Box::new(group),
            threshold,
            memory: AlphaMemory::new(),
            counts: Mutex::new(HashMap::new()),
            children: ChildSet::new(),
        }
    }

    /// The current count for a group key.
    #[must_use]
    pub fn group_count(&self, group_key: &str) -> usize {
        self.counts
            .lock()
            .expect("aggregate counts lock poisoned")
            .get(group_key)
            .copied()
            .unwrap_or(0)
    }
}

impl Node for AggregateNode {
    fn assert_fact(&self, fact: &SharedFact) {
        if !self.memory.insert(fact) {
            return;
        }
        let Some(group_key) = (self.group)(fact.as_ref()) else {
            return;
        };

        let crossed = {
            let mut counts = self.counts.lock().expect("aggregate counts lock poisoned");
            let count = counts.entry(group_key.clone()).or_insert(0);
            *count += 1;
            *count == self.threshold
        };

        if crossed {
            let result: SharedFact = Arc::new(AggregateResult {
                group_key: group_key.clone(),
                count: self.threshold,
            });
            trace!(group = %group_key, threshold = self.threshold, "aggregate threshold reached");
            self.children.propagate_assert_fact(&result);
        }
    }

    // Retraction never decrements counts nor retracts emitted results.
    fn retract_fact(&self, _fact: &SharedFact) {}

    fn assert_token(&self, _token: &Token) {}

    fn retract_token(&self, _token: &Token) {}

    fn add_child(&self, child: Arc<dyn Node>) {
        self.children.add(child);
    }
}
