//! The uniform node protocol and child plumbing.
//!
//! Every node in the network speaks the same four-signal protocol: assert
//! and retract for facts (alpha layer) and for tokens (beta layer). Nodes
//! that do not handle a signal kind treat it as a no-op. Children are
//! non-owning shared handles registered in call order; propagation visits
//! them in that order, recursively and synchronously, so the entire
//! reachable subgraph settles before an external assert or retract returns.

use std::sync::{Arc, RwLock};

use trellis_foundation::{SharedFact, Token};

/// The protocol every network node exposes.
///
/// The graph must be acyclic; a node reaching itself as a descendant
/// recurses without bound. The network does not detect cycles.
pub trait Node: Send + Sync {
    /// Handles an asserted fact arriving on this node's fact port.
    fn assert_fact(&self, fact: &SharedFact);

    /// Handles a retracted fact arriving on this node's fact port.
    fn retract_fact(&self, fact: &SharedFact);

    /// Handles an asserted token arriving on this node's token port.
    fn assert_token(&self, token: &Token);

    /// Handles a retracted token arriving on this node's token port.
    fn retract_token(&self, token: &Token);

    /// Registers a downstream consumer. Registration order is propagation
    /// order.
    fn add_child(&self, child: Arc<dyn Node>);
}

/// Ordered set of downstream nodes with propagation helpers.
///
/// Mutation and traversal take a snapshot of the child list, so a
/// concurrent `add_child` cannot invalidate an in-flight cascade.
#[derive(Default)]
pub struct ChildSet {
    children: RwLock<Vec<Arc<dyn Node>>>,
}

impl ChildSet {
    /// Creates an empty child set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child.
    pub fn add(&self, child: Arc<dyn Node>) {
        self.children.write().expect("child set lock poisoned").push(child);
    }

    fn snapshot(&self) -> Vec<Arc<dyn Node>> {
        self.children.read().expect("child set lock poisoned").clone()
    }

    /// Forwards a fact assert to every child in registration order.
    pub fn propagate_assert_fact(&self, fact: &SharedFact) {
        for child in self.snapshot() {
            child.assert_fact(fact);
        }
    }

    /// Forwards a fact retract to every child in registration order.
    pub fn propagate_retract_fact(&self, fact: &SharedFact) {
        for child in self.snapshot() {
            child.retract_fact(fact);
        }
    }

    /// Forwards a token assert to every child in registration order.
    pub fn propagate_assert_token(&self, token: &Token) {
        for child in self.snapshot() {
            child.assert_token(token);
        }
    }

    /// Forwards a token retract to every child in registration order.
    pub fn propagate_retract_token(&self, token: &Token) {
        for child in self.snapshot() {
            child.retract_token(token);
        }
    }
}

/// Adapter that forwards only the token stream to its target.
///
/// An alpha node propagates both a raw fact and a single-fact token to
/// every child. Wiring a two-input node through a `LeftInput` keeps its
/// left port clean when its parent emits both streams.
pub struct LeftInput {
    target: Arc<dyn Node>,
}

impl LeftInput {
    /// Wraps `target` so only tokens reach it.
    #[must_use]
    pub fn new(target: Arc<dyn Node>) -> Arc<Self> {
        Arc::new(Self { target })
    }
}

impl Node for LeftInput {
    fn assert_fact(&self, _fact: &SharedFact) {}

    fn retract_fact(&self, _fact: &SharedFact) {}

    fn assert_token(&self, token: &Token) {
        self.target.assert_token(token);
    }

    fn retract_token(&self, token: &Token) {
        self.target.retract_token(token);
    }

    fn add_child(&self, child: Arc<dyn Node>) {
        self.target.add_child(child);
    }
}

/// Adapter that forwards only the fact stream to its target.
pub struct RightInput {
    target: Arc<dyn Node>,
}

impl RightInput {
    /// Wraps `target` so only facts reach it.
    #[must_use]
    pub fn new(target: Arc<dyn Node>) -> Arc<Self> {
        Arc::new(Self { target })
    }
}

impl Node for RightInput {
    fn assert_fact(&self, fact: &SharedFact) {
        self.target.assert_fact(fact);
    }

    fn retract_fact(&self, fact: &SharedFact) {
        self.target.retract_fact(fact);
    }

    fn assert_token(&self, _token: &Token) {}

    fn retract_token(&self, _token: &Token) {}

    fn add_child(&self, child: Arc<dyn Node>) {
        self.target.add_child(child);
    }
}
