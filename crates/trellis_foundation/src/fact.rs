//! Facts and fact keys.
//!
//! A fact is any value the surrounding application asserts into the engine.
//! The engine never inspects a fact's payload; it only relies on the fact's
//! key for identity (deduplication and retraction) and hands the fact back
//! to caller-supplied predicates, which downcast to the concrete type they
//! expect.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identity of a fact within working memory.
///
/// Keys are cheap to clone (shared string storage) and are typically built
/// from a business primary key, e.g. `"User:42"` or `"Cart:101"`. Two
/// logically distinct facts must never share a key; the engine does not
/// detect aliasing.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactKey(Arc<str>);

impl FactKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactKey {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for FactKey {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactKey({})", self.0)
    }
}

/// The capability every asserted value must provide.
///
/// `key` must be unique per distinct fact instance for the lifetime of the
/// working memory. `as_any` exposes the concrete type to compiled
/// predicates; the standard implementation is `fn as_any(&self) -> &dyn Any
/// { self }`.
pub trait Fact: Any + fmt::Debug + Send + Sync {
    /// Returns the unique identity of this fact.
    fn key(&self) -> FactKey;

    /// Upcasts to [`Any`] for typed downcasting in predicates.
    fn as_any(&self) -> &dyn Any;
}

/// A reference-counted handle to a fact.
///
/// Facts are owned by the caller; the network only stores these shared
/// handles in its memories.
pub type SharedFact = Arc<dyn Fact>;

/// Synthetic fact emitted when an aggregation group reaches its threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregateResult {
    /// The group that crossed the threshold.
    pub group_key: String,
    /// The threshold count at the moment of emission.
    pub count: usize,
}

impl Fact for AggregateResult {
    fn key(&self) -> FactKey {
        format!("agg:{}", self.group_key).into()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
