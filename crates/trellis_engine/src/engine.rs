//! The engine: alpha roots, agenda, and the firing loop.

use std::sync::Arc;

use tracing::debug;
use trellis_foundation::{Result, SharedFact};
use trellis_network::{AlphaNode, Node};

use crate::agenda::Agenda;
use crate::rule::{NetworkCompiler, Rule};

/// Glue over the matching network and the agenda.
///
/// Holds the alpha-layer roots; an external assert or retract is forwarded
/// to every root in registration order and the full synchronous cascade
/// completes before the call returns. Firing is a separate phase: the
/// agenda accumulates activations during the cascade and [`Engine::fire_all`]
/// drains it.
pub struct Engine {
    roots: Vec<Arc<AlphaNode>>,
    agenda: Arc<Agenda>,
    compiler: NetworkCompiler,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with an empty network and agenda.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            agenda: Arc::new(Agenda::new()),
            compiler: NetworkCompiler::new(),
        }
    }

    /// Registers an alpha-layer root. Roots already registered (by
    /// identity) are skipped, so shared alpha nodes are fed once per
    /// assert.
    pub fn add_root(&mut self, root: Arc<AlphaNode>) {
        if !self.roots.iter().any(|r| Arc::ptr_eq(r, &root)) {
            self.roots.push(root);
        }
    }

    /// Compiles rule definitions into the network and registers their
    /// roots.
    ///
    /// # Errors
    /// Returns an error if any rule fails to compile; rules before the
    /// failing one remain loaded.
    pub fn load_rules(&mut self, rules: Vec<Rule>) -> Result<()> {
        for rule in rules {
            let sink = self.agenda.clone();
            for root in self.compiler.compile(rule, sink)? {
                self.add_root(root);
            }
        }
        Ok(())
    }

    /// Asserts a fact into every root.
    pub fn assert_fact(&self, fact: &SharedFact) {
        for root in &self.roots {
            root.assert_fact(fact);
        }
    }

    /// Retracts a fact from every root.
    pub fn retract_fact(&self, fact: &SharedFact) {
        for root in &self.roots {
            root.retract_fact(fact);
        }
    }

    /// Fires the highest-priority pending activation. Returns false when
    /// the agenda is empty.
    pub fn fire_next(&self) -> bool {
        match self.agenda.next() {
            Some(activation) => {
                debug!(rule = activation.rule_name(), "rule fired");
                activation.fire();
                true
            }
            None => false,
        }
    }

    /// Fires pending activations until the agenda is empty, returning the
    /// number fired.
    ///
    /// Actions may assert or retract further facts; activations they
    /// produce are fired in the same drain.
    pub fn fire_all(&self) -> usize {
        let mut fired = 0;
        while self.fire_next() {
            fired += 1;
        }
        fired
    }

    /// The shared agenda.
    #[must_use]
    pub fn agenda(&self) -> &Arc<Agenda> {
        &self.agenda
    }

    /// Number of registered alpha roots.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}
