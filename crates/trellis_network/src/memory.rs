//! Deduplicating node memories.
//!
//! Each node privately owns its memories; a per-memory lock serializes
//! mutation, and snapshots are persistent-map clones, so an in-flight join
//! iterating a snapshot cannot be corrupted by a concurrent assert or
//! retract. Backed by the `im` persistent collections so a snapshot is an
//! O(1) structural-sharing copy rather than a deep copy.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use trellis_foundation::{FactKey, SharedFact, Token};

/// Store of facts that passed an alpha condition, keyed by fact key.
///
/// One entry per key: asserting a duplicate key is a no-op and the stored
/// fact instance is kept, retracting removes at most one entry.
#[derive(Default)]
pub struct AlphaMemory {
    facts: RwLock<im::HashMap<FactKey, SharedFact>>,
}

impl AlphaMemory {
    /// Creates an empty alpha memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fact. Returns false (and leaves the memory unchanged) if
    /// the key is already present.
    pub fn insert(&self, fact: &SharedFact) -> bool {
        let key = fact.key();
        let mut facts = self.facts.write().expect("alpha memory lock poisoned");
        if facts.contains_key(&key) {
            return false;
        }
        facts.insert(key, fact.clone());
        true
    }

    /// Removes the fact with this fact's key. Returns false if absent.
    pub fn remove(&self, fact: &SharedFact) -> bool {
        let mut facts = self.facts.write().expect("alpha memory lock poisoned");
        facts.remove(&fact.key()).is_some()
    }

    /// Returns true if a fact with this key is present.
    #[must_use]
    pub fn contains(&self, key: &FactKey) -> bool {
        self.facts
            .read()
            .expect("alpha memory lock poisoned")
            .contains_key(key)
    }

    /// Returns a point-in-time copy of the stored facts.
    #[must_use]
    pub fn snapshot(&self) -> im::HashMap<FactKey, SharedFact> {
        self.facts.read().expect("alpha memory lock poisoned").clone()
    }

    /// Number of stored facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.read().expect("alpha memory lock poisoned").len()
    }

    /// Returns true if no facts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Store of tokens produced by the beta layer, keyed by token identity.
///
/// Token identity is the content hash plus exact structural comparison of
/// the ordered key sequence, so hash collisions cannot alias two distinct
/// tokens.
#[derive(Default)]
pub struct BetaMemory {
    tokens: RwLock<im::HashSet<Token>>,
}

impl BetaMemory {
    /// Creates an empty beta memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a token. Returns false if an equal token is already present.
    pub fn insert(&self, token: &Token) -> bool {
        let mut tokens = self.tokens.write().expect("beta memory lock poisoned");
        if tokens.contains(token) {
            return false;
        }
        tokens.insert(token.clone());
        true
    }

    /// Removes a token. Returns false if absent.
    pub fn remove(&self, token: &Token) -> bool {
        let mut tokens = self.tokens.write().expect("beta memory lock poisoned");
        tokens.remove(token).is_some()
    }

    /// Returns true if an equal token is present.
    #[must_use]
    pub fn contains(&self, token: &Token) -> bool {
        self.tokens
            .read()
            .expect("beta memory lock poisoned")
            .contains(token)
    }

    /// Returns a point-in-time copy of the stored tokens.
    #[must_use]
    pub fn snapshot(&self) -> im::HashSet<Token> {
        self.tokens.read().expect("beta memory lock poisoned").clone()
    }

    /// Number of stored tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.read().expect("beta memory lock poisoned").len()
    }

    /// Returns true if no tokens are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-token count of currently matching right-hand facts.
///
/// Negation and existence nodes never materialize their joined tokens;
/// they only track how many right facts each left token currently matches
/// and signal when that count crosses the zero boundary. Keyed by token
/// content hash.
#[derive(Default)]
pub struct MatchCounts {
    counts: Mutex<HashMap<u64, usize>>,
}

impl MatchCounts {
    /// Creates an empty counter store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the initial match count for a token.
    pub fn record(&self, token: &Token, count: usize) {
        self.counts
            .lock()
            .expect("match counts lock poisoned")
            .insert(token.content_hash(), count);
    }

    /// Increments a token's count, returning the count before the
    /// increment.
    pub fn increment(&self, token: &Token) -> usize {
        let mut counts = self.counts.lock().expect("match counts lock poisoned");
        let count = counts.entry(token.content_hash()).or_insert(0);
        let previous = *count;
        *count += 1;
        previous
    }

    /// Decrements a token's count, returning the count after the
    /// decrement.
    pub fn decrement(&self, token: &Token) -> usize {
        let mut counts = self.counts.lock().expect("match counts lock poisoned");
        let count = counts.entry(token.content_hash()).or_insert(0);
        *count = count.saturating_sub(1);
        *count
    }

    /// Drops a token's entry, returning its last known count.
    pub fn forget(&self, token: &Token) -> Option<usize> {
        self.counts
            .lock()
            .expect("match counts lock poisoned")
            .remove(&token.content_hash())
    }

    /// Returns a token's current count, if tracked.
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<usize> {
        self.counts
            .lock()
            .expect("match counts lock poisoned")
            .get(&token.content_hash())
            .copied()
    }
}
