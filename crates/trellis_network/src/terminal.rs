//! Terminal nodes: convert fully matched tokens into pending activations.

use std::sync::Arc;

use trellis_foundation::{SharedFact, Token};

use crate::node::Node;

/// The action a rule runs when it fires, given the matched token.
pub type RuleAction = Arc<dyn Fn(&Token) + Send + Sync>;

/// A 0-argument action closure bound over a specific matched token.
pub type ActivationAction = Box<dyn FnOnce() + Send>;

/// Receiver of activations produced by terminal nodes.
///
/// The agenda implements this; the trait keeps the network layer free of a
/// dependency on the scheduling layer.
pub trait ActivationSink: Send + Sync {
    /// Accepts a pending activation.
    fn add(
        &self,
        rule: &str,
        token: Token,
        action: ActivationAction,
        salience: i32,
        specificity: usize,
    );
}

/// Leaf of the network: hands each arriving token to the activation sink
/// as a pending rule firing.
///
/// Token retraction is a no-op by design: a pending activation is not
/// withdrawn when its token's underlying facts are retracted upstream.
/// Callers needing that behavior remove the activation from the agenda
/// explicitly.
pub struct TerminalNode {
    rule_name: String,
    sink: Arc<dyn ActivationSink>,
    action: RuleAction,
    salience: i32,
    specificity: usize,
}

impl TerminalNode {
    /// Creates a terminal node for the named rule.
    pub fn new(
        rule_name: impl Into<String>,
        sink: Arc<dyn ActivationSink>,
        action: RuleAction,
        salience: i32,
        specificity: usize,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            sink,
            action,
            salience,
            specificity,
        }
    }

    /// The rule this terminal completes.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }
}

impl Node for TerminalNode {
    fn assert_token(&self, token: &Token) {
        let action = self.action.clone();
        let bound = token.clone();
        self.sink.add(
            &self.rule_name,
            token.clone(),
            Box::new(move || (*action)(&bound)),
            self.salience,
            self.specificity,
        );
    }

    // Pending activations survive upstream retraction.
    fn retract_token(&self, _token: &Token) {}

    // Terminals never sit in the alpha layer.
    fn assert_fact(&self, _fact: &SharedFact) {}

    fn retract_fact(&self, _fact: &SharedFact) {}

    // Terminals are leaves.
    fn add_child(&self, _child: Arc<dyn Node>) {}
}
