//! Existence nodes: propagate a partial match only while at least one
//! right-hand fact matches it.
//!
//! The logical dual of [`NegationNode`](crate::negation::NegationNode):
//! the same counter mechanism, with assert on the 0 to 1 transition and
//! retract on the 1 to 0 transition.

use std::sync::Arc;

use trellis_foundation::{Fact, SharedFact, Token};

use crate::join::JoinPredicate;
use crate::memory::{AlphaMemory, BetaMemory, MatchCounts};
use crate::node::{ChildSet, Node};

/// Propagates left tokens for which the right-hand pattern is present.
pub struct ExistenceNode {
    join: JoinPredicate,
    left: BetaMemory,
    right: AlphaMemory,
    counts: MatchCounts,
    children: ChildSet,
}

impl ExistenceNode {
    /// Creates an existence node with the given join predicate.
    pub fn new(join: impl Fn(&Token, &dyn Fact) -> bool + Send + Sync + 'static) -> Self {
        Self {
            join: Box::new(join),
            left: BetaMemory::new(),
            right: AlphaMemory::new(),
            counts: MatchCounts::new(),
            children: ChildSet::new(),
        }
    }

    fn count_matches(&self, token: &Token) -> usize {
        self.right
            .snapshot()
            .values()
            .filter(|fact| (self.join)(token, fact.as_ref()))
            .count()
    }

    fn matching_left_tokens(&self, fact: &SharedFact) -> Vec<Token> {
        self.left
            .snapshot()
            .iter()
            .filter(|token| (self.join)(token, fact.as_ref()))
            .cloned()
            .collect()
    }
}

impl Node for ExistenceNode {
    fn assert_token(&self, token: &Token) {
        if !self.left.insert(token) {
            return;
        }
        let count = self.count_matches(token);
        self.counts.record(token, count);
        if count > 0 {
            self.children.propagate_assert_token(token);
        }
    }

    fn retract_token(&self, token: &Token) {
        if !self.left.remove(token) {
            return;
        }
        if self.counts.forget(token).is_some_and(|count| count > 0) {
            self.children.propagate_retract_token(token);
        }
    }

    fn assert_fact(&self, fact: &SharedFact) {
        if !self.right.insert(fact) {
            return;
        }
        for token in self.matching_left_tokens(fact) {
            if self.counts.increment(&token) == 0 {
                // Existence established.
                self.children.propagate_assert_token(&token);
            }
        }
    }

    fn retract_fact(&self, fact: &SharedFact) {
        if !self.right.remove(fact) {
            return;
        }
        for token in self.matching_left_tokens(fact) {
            if self.counts.decrement(&token) == 0 {
                // Existence lost.
                self.children.propagate_retract_token(&token);
            }
        }
    }

    fn add_child(&self, child: Arc<dyn Node>) {
        self.children.add(child);
    }
}
