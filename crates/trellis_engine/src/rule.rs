//! Typed rule definitions.
//!
//! A rule is a name, a priority, an ordered list of conditions, and an
//! action. Conditions carry compiled closures over concrete fact types
//! rather than field names interpreted at runtime: a predicate type-tests
//! the fact by downcast and facts of other types simply fail the test.
//!
//! The condition `label` identifies an alpha filter for sharing: two
//! conditions with the same label (in the same or different rules) are
//! served by one alpha node, so a fact is filtered once no matter how many
//! rules consume the stream.

pub mod compiler;

pub use compiler::NetworkCompiler;

use trellis_foundation::{Fact, Token};
use trellis_network::{AlphaPredicate, GroupKeyFn, JoinPredicate, RuleAction};

// =============================================================================
// Typed predicate adapters
// =============================================================================

/// Adapts a typed closure into an alpha predicate.
///
/// Facts that are not a `T` fail the test.
pub fn fact_test<T: Fact>(test: impl Fn(&T) -> bool + Send + Sync + 'static) -> AlphaPredicate {
    Box::new(move |fact| fact.as_any().downcast_ref::<T>().is_some_and(|f| test(f)))
}

/// Adapts a typed binary closure into a join predicate over the token's
/// most recent fact and the right-hand fact.
///
/// The pairing fails if either side is not the expected type.
pub fn join_last<L: Fact, R: Fact>(
    join: impl Fn(&L, &R) -> bool + Send + Sync + 'static,
) -> JoinPredicate {
    Box::new(move |token: &Token, fact: &dyn Fact| {
        let Some(left) = token
            .facts()
            .last()
            .and_then(|f| f.as_any().downcast_ref::<L>())
        else {
            return false;
        };
        let Some(right) = fact.as_any().downcast_ref::<R>() else {
            return false;
        };
        join(left, right)
    })
}

/// Adapts a typed closure into a grouping function.
///
/// Facts that are not a `T` are skipped.
pub fn group_by<T: Fact>(
    group: impl Fn(&T) -> String + Send + Sync + 'static,
) -> GroupKeyFn {
    Box::new(move |fact| fact.as_any().downcast_ref::<T>().map(|f| group(f)))
}

// =============================================================================
// Conditions
// =============================================================================

/// One clause of a rule.
pub enum Condition {
    /// An alpha filter. As the first condition it anchors the rule's
    /// chain; as a later condition it joins unconditionally (a cross
    /// product with the match so far).
    Filter {
        /// Shared-alpha identity of this filter.
        label: String,
        /// The filter predicate.
        test: AlphaPredicate,
    },
    /// An alpha filter whose stream is joined to the match so far.
    Join {
        /// Shared-alpha identity of the right-hand filter.
        label: String,
        /// The right-hand filter predicate.
        test: AlphaPredicate,
        /// Pairing predicate between the match so far and a right fact.
        join: JoinPredicate,
    },
    /// The match survives only while no right-hand fact pairs with it.
    Not {
        /// Shared-alpha identity of the right-hand filter.
        label: String,
        /// The right-hand filter predicate.
        test: AlphaPredicate,
        /// Pairing predicate between the match so far and a right fact.
        join: JoinPredicate,
    },
    /// The match survives only while at least one right-hand fact pairs
    /// with it.
    Exists {
        /// Shared-alpha identity of the right-hand filter.
        label: String,
        /// The right-hand filter predicate.
        test: AlphaPredicate,
        /// Pairing predicate between the match so far and a right fact.
        join: JoinPredicate,
    },
    /// Per-group threshold count over a filtered fact stream. Only valid
    /// as a rule's first condition.
    Aggregate {
        /// Shared-alpha identity of the input filter.
        label: String,
        /// The input filter predicate.
        test: AlphaPredicate,
        /// Extracts each fact's group key.
        group: GroupKeyFn,
        /// Count at which the group emits its result.
        threshold: usize,
    },
}

impl Condition {
    /// Creates a filter condition.
    pub fn filter(label: impl Into<String>, test: AlphaPredicate) -> Self {
        Self::Filter {
            label: label.into(),
            test,
        }
    }

    /// Creates a join condition.
    pub fn join(label: impl Into<String>, test: AlphaPredicate, join: JoinPredicate) -> Self {
        Self::Join {
            label: label.into(),
            test,
            join,
        }
    }

    /// Creates a negation condition.
    pub fn not(label: impl Into<String>, test: AlphaPredicate, join: JoinPredicate) -> Self {
        Self::Not {
            label: label.into(),
            test,
            join,
        }
    }

    /// Creates an existence condition.
    pub fn exists(label: impl Into<String>, test: AlphaPredicate, join: JoinPredicate) -> Self {
        Self::Exists {
            label: label.into(),
            test,
            join,
        }
    }

    /// Creates an aggregation condition.
    pub fn aggregate(
        label: impl Into<String>,
        test: AlphaPredicate,
        group: GroupKeyFn,
        threshold: usize,
    ) -> Self {
        Self::Aggregate {
            label: label.into(),
            test,
            group,
            threshold,
        }
    }

    /// A short description used in compile errors.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "filter",
            Self::Join { .. } => "join",
            Self::Not { .. } => "not",
            Self::Exists { .. } => "exists",
            Self::Aggregate { .. } => "aggregate",
        }
    }
}

// =============================================================================
// Rules
// =============================================================================

/// A declarative rule ready for compilation into the network.
pub struct Rule {
    /// Rule name, unique among loaded rules.
    pub name: String,
    /// Priority; higher fires first. Defaults to 0.
    pub salience: i32,
    /// Ordered conditions; the count is the rule's specificity.
    pub conditions: Vec<Condition>,
    /// Action invoked with the matched token when the rule fires.
    pub action: RuleAction,
}

impl Rule {
    /// Creates a rule with the given name and action.
    pub fn new(
        name: impl Into<String>,
        action: impl Fn(&Token) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            salience: 0,
            conditions: Vec::new(),
            action: std::sync::Arc::new(action),
        }
    }

    /// Sets the salience (priority).
    #[must_use]
    pub fn with_salience(mut self, salience: i32) -> Self {
        self.salience = salience;
        self
    }

    /// Appends a condition.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The rule's specificity: the number of conditions.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.conditions.len()
    }
}
