//! Join nodes: extending partial matches with a second fact stream.

use std::sync::Arc;

use trellis_foundation::{Fact, SharedFact, Token};

use crate::memory::{AlphaMemory, BetaMemory};
use crate::node::{ChildSet, Node};

/// Predicate deciding whether a partial match and a fact belong together.
///
/// Must be pure and side-effect-free; join evaluation order follows memory
/// snapshot iteration order, which is unordered.
pub type JoinPredicate = Box<dyn Fn(&Token, &dyn Fact) -> bool + Send + Sync>;

/// Joins a left stream of tokens against a right stream of facts.
///
/// Each accepted pairing propagates the left token extended with the right
/// fact. Retraction rebuilds the same extended tokens deterministically
/// (token identity is a pure function of the ordered fact keys) and
/// propagates retract signals for them.
pub struct JoinNode {
    join: JoinPredicate,
    left: BetaMemory,
    right: AlphaMemory,
    children: ChildSet,
}

impl JoinNode {
    /// Creates a join node with the given predicate.
    pub fn new(join: impl Fn(&Token, &dyn Fact) -> bool + Send + Sync + 'static) -> Self {
        Self {
            join: Box::new(join),
            left: BetaMemory::new(),
            right: AlphaMemory::new(),
            children: ChildSet::new(),
        }
    }

    /// The left (token) memory.
    #[must_use]
    pub fn left_memory(&self) -> &BetaMemory {
        &self.left
    }

    /// The right (fact) memory.
    #[must_use]
    pub fn right_memory(&self) -> &AlphaMemory {
        &self.right
    }
}

impl Node for JoinNode {
    fn assert_token(&self, token: &Token) {
        if !self.left.insert(token) {
            return;
        }
        for fact in self.right.snapshot().values() {
            if (self.join)(token, fact.as_ref()) {
                self.children
                    .propagate_assert_token(&token.extend(fact.clone()));
            }
        }
    }

    fn retract_token(&self, token: &Token) {
        if !self.left.remove(token) {
            return;
        }
        for fact in self.right.snapshot().values() {
            if (self.join)(token, fact.as_ref()) {
                self.children
                    .propagate_retract_token(&token.extend(fact.clone()));
            }
        }
    }

    fn assert_fact(&self, fact: &SharedFact) {
        if !self.right.insert(fact) {
            return;
        }
        for token in self.left.snapshot().iter() {
            if (self.join)(token, fact.as_ref()) {
                self.children
                    .propagate_assert_token(&token.extend(fact.clone()));
            }
        }
    }

    fn retract_fact(&self, fact: &SharedFact) {
        if !self.right.remove(fact) {
            return;
        }
        for token in self.left.snapshot().iter() {
            if (self.join)(token, fact.as_ref()) {
                self.children
                    .propagate_retract_token(&token.extend(fact.clone()));
            }
        }
    }

    fn add_child(&self, child: Arc<dyn Node>) {
        self.children.add(child);
    }
}
