//! Error types for the Trellis system.
//!
//! Uses `thiserror` for ergonomic error definition. The matching network
//! itself has no failure modes (duplicate asserts and absent retracts are
//! silent no-ops), so errors only arise while compiling rule definitions
//! into a node network.

use thiserror::Error;

/// Result alias used throughout Trellis.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A rule definition had no conditions to anchor the network on.
    #[error("rule '{0}' has no conditions")]
    EmptyRule(String),

    /// A condition appeared in a position the network compiler cannot wire.
    #[error("rule '{rule}': {condition} condition cannot appear at position {position}")]
    UnsupportedCondition {
        /// The rule being compiled.
        rule: String,
        /// A short description of the offending condition.
        condition: String,
        /// Zero-based position of the condition within the rule.
        position: usize,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates an empty-rule error.
    #[must_use]
    pub fn empty_rule(rule: impl Into<String>) -> Self {
        Self::EmptyRule(rule.into())
    }

    /// Creates an unsupported-condition error.
    #[must_use]
    pub fn unsupported_condition(
        rule: impl Into<String>,
        condition: impl Into<String>,
        position: usize,
    ) -> Self {
        Self::UnsupportedCondition {
            rule: rule.into(),
            condition: condition.into(),
            position,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
