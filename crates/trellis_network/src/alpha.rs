//! Alpha nodes: single-fact filtering.

use std::sync::Arc;

use trellis_foundation::{Fact, SharedFact, Token};

use crate::memory::AlphaMemory;
use crate::node::{ChildSet, Node};

/// Predicate deciding whether an alpha node accepts a fact.
///
/// Caller-supplied and assumed total; the node never reports predicate
/// failure, it simply ignores the fact.
pub type AlphaPredicate = Box<dyn Fn(&dyn Fact) -> bool + Send + Sync>;

/// Entry point of the network: filters single facts by a predicate.
///
/// An accepted fact is propagated twice, once as a raw fact for children
/// acting as right inputs and once as a freshly built single-fact token for
/// children acting as left inputs. Downstream nodes (or the input-port
/// adapters) pick the stream they care about.
pub struct AlphaNode {
    predicate: AlphaPredicate,
    memory: AlphaMemory,
    children: ChildSet,
}

impl AlphaNode {
    /// Creates an alpha node with the given predicate.
    pub fn new(predicate: impl Fn(&dyn Fact) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
            memory: AlphaMemory::new(),
            children: ChildSet::new(),
        }
    }

    /// The node's memory of accepted facts.
    #[must_use]
    pub fn memory(&self) -> &AlphaMemory {
        &self.memory
    }
}

impl Node for AlphaNode {
    fn assert_fact(&self, fact: &SharedFact) {
        if !(self.predicate)(fact.as_ref()) {
            return;
        }
        if self.memory.insert(fact) {
            self.children.propagate_assert_fact(fact);
            self.children
                .propagate_assert_token(&Token::single(fact.clone()));
        }
    }

    fn retract_fact(&self, fact: &SharedFact) {
        if !(self.predicate)(fact.as_ref()) {
            return;
        }
        if self.memory.remove(fact) {
            self.children.propagate_retract_fact(fact);
            self.children
                .propagate_retract_token(&Token::single(fact.clone()));
        }
    }

    // The alpha layer never receives tokens.
    fn assert_token(&self, _token: &Token) {}

    fn retract_token(&self, _token: &Token) {}

    fn add_child(&self, child: Arc<dyn Node>) {
        self.children.add(child);
    }
}
