//! The incremental matching network for Trellis.
//!
//! This crate provides:
//! - [`Node`] - The uniform assert/retract protocol all nodes speak
//! - [`AlphaNode`] - Single-fact filtering
//! - [`JoinNode`] - Token-against-fact joins
//! - [`NegationNode`] / [`ExistenceNode`] - Counter-based absence/presence
//! - [`AggregateNode`] - Per-group threshold counting
//! - [`TerminalNode`] - Token-to-activation conversion
//! - [`AlphaMemory`] / [`BetaMemory`] - Deduplicating node memories

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aggregate;
mod alpha;
mod existence;
mod join;
mod memory;
mod negation;
mod node;
mod terminal;

pub use aggregate::{AggregateNode, GroupKeyFn};
pub use alpha::{AlphaNode, AlphaPredicate};
pub use existence::ExistenceNode;
pub use join::{JoinNode, JoinPredicate};
pub use memory::{AlphaMemory, BetaMemory, MatchCounts};
pub use negation::NegationNode;
pub use node::{ChildSet, LeftInput, Node, RightInput};
pub use terminal::{ActivationAction, ActivationSink, RuleAction, TerminalNode};
