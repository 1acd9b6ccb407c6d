//! Compiles rule definitions into a wired node network.
//!
//! Each rule becomes a chain: the first condition anchors it on an alpha
//! node (or an aggregation behind one), later conditions extend it with
//! join, negation, or existence nodes, and a terminal node bound to the
//! activation sink closes it. Alpha nodes are shared across rules by
//! condition label, so one fact stream feeds every rule that filters the
//! same way.
//!
//! Two-input nodes are wired through the input-port adapters: the chain
//! head reaches the left (token) port, the right-hand alpha reaches the
//! right (fact) port. Without the adapters an alpha parent would feed both
//! of its streams into both ports.

use std::collections::HashMap;
use std::sync::Arc;

use trellis_foundation::{AggregateResult, Error, Fact, Result, Token};
use trellis_network::{
    ActivationSink, AggregateNode, AlphaNode, AlphaPredicate, ExistenceNode, JoinNode, LeftInput,
    NegationNode, Node, RightInput, TerminalNode,
};

use super::{Condition, Rule};

/// Wires rule definitions into the node DAG.
///
/// Keeps the shared-alpha table across calls so later rules reuse the
/// alpha nodes of earlier ones. When a label is reused the already-built
/// node wins and the newly supplied predicate is dropped; reusing a label
/// with a different predicate is a caller error the compiler cannot
/// detect.
#[derive(Default)]
pub struct NetworkCompiler {
    shared_alphas: HashMap<String, Arc<AlphaNode>>,
}

impl NetworkCompiler {
    /// Creates a compiler with an empty shared-alpha table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles one rule, returning the alpha roots that feed it.
    ///
    /// Roots already returned for an earlier rule may appear again when a
    /// label is shared; registering them twice is harmless because the
    /// engine deduplicates roots by identity.
    ///
    /// # Errors
    /// Returns an error if the rule has no conditions, if its first
    /// condition is not a filter or an aggregation, or if an aggregation
    /// appears past the first position.
    pub fn compile(
        &mut self,
        rule: Rule,
        sink: Arc<dyn ActivationSink>,
    ) -> Result<Vec<Arc<AlphaNode>>> {
        let Rule {
            name,
            salience,
            conditions,
            action,
        } = rule;

        if conditions.is_empty() {
            return Err(Error::empty_rule(name));
        }
        let specificity = conditions.len();

        let terminal: Arc<dyn Node> = Arc::new(TerminalNode::new(
            name.clone(),
            sink,
            action,
            salience,
            specificity,
        ));

        let mut roots: Vec<Arc<AlphaNode>> = Vec::new();
        let mut conditions = conditions.into_iter();

        // The first condition anchors the chain.
        let mut head: Arc<dyn Node> = match conditions.next().expect("conditions checked non-empty")
        {
            Condition::Filter { label, test } => {
                let alpha = self.alpha_for(&label, test);
                roots.push(alpha.clone());
                alpha
            }
            Condition::Aggregate {
                label,
                test,
                group,
                threshold,
            } => {
                let alpha = self.alpha_for(&label, test);
                roots.push(alpha.clone());

                let aggregate: Arc<dyn Node> = Arc::new(AggregateNode::new(group, threshold));
                alpha.add_child(RightInput::new(aggregate.clone()));

                // Result facts re-enter the chain as single-fact tokens.
                let results: Arc<dyn Node> = Arc::new(AlphaNode::new(|fact| {
                    fact.as_any().downcast_ref::<AggregateResult>().is_some()
                }));
                aggregate.add_child(results.clone());
                results
            }
            other => {
                return Err(Error::unsupported_condition(name, other.describe(), 0));
            }
        };

        // Later conditions extend it.
        for (position, condition) in conditions.enumerate() {
            let node: Arc<dyn Node> = match condition {
                Condition::Filter { label, test } => {
                    // A bare filter past the anchor is an unconditional
                    // join with the match so far.
                    let alpha = self.alpha_for(&label, test);
                    roots.push(alpha.clone());
                    let join: Arc<dyn Node> =
                        Arc::new(JoinNode::new(|_: &Token, _: &dyn Fact| true));
                    head.add_child(LeftInput::new(join.clone()));
                    alpha.add_child(RightInput::new(join.clone()));
                    join
                }
                Condition::Join { label, test, join } => {
                    let alpha = self.alpha_for(&label, test);
                    roots.push(alpha.clone());
                    let node: Arc<dyn Node> = Arc::new(JoinNode::new(join));
                    head.add_child(LeftInput::new(node.clone()));
                    alpha.add_child(RightInput::new(node.clone()));
                    node
                }
                Condition::Not { label, test, join } => {
                    let alpha = self.alpha_for(&label, test);
                    roots.push(alpha.clone());
                    let node: Arc<dyn Node> = Arc::new(NegationNode::new(join));
                    head.add_child(LeftInput::new(node.clone()));
                    alpha.add_child(RightInput::new(node.clone()));
                    node
                }
                Condition::Exists { label, test, join } => {
                    let alpha = self.alpha_for(&label, test);
                    roots.push(alpha.clone());
                    let node: Arc<dyn Node> = Arc::new(ExistenceNode::new(join));
                    head.add_child(LeftInput::new(node.clone()));
                    alpha.add_child(RightInput::new(node.clone()));
                    node
                }
                other @ Condition::Aggregate { .. } => {
                    return Err(Error::unsupported_condition(
                        name,
                        other.describe(),
                        position + 1,
                    ));
                }
            };
            head = node;
        }

        head.add_child(terminal);
        Ok(roots)
    }

    /// Number of distinct shared alpha nodes built so far.
    #[must_use]
    pub fn alpha_count(&self) -> usize {
        self.shared_alphas.len()
    }

    fn alpha_for(&mut self, label: &str, test: AlphaPredicate) -> Arc<AlphaNode> {
        if let Some(existing) = self.shared_alphas.get(label) {
            return existing.clone();
        }
        let alpha = Arc::new(AlphaNode::new(test));
        self.shared_alphas.insert(label.to_string(), alpha.clone());
        alpha
    }
}
