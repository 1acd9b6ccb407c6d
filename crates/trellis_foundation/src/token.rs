//! Tokens: ordered partial matches.
//!
//! A token is the chain of facts accumulated while a match traverses join
//! nodes. Tokens are immutable after construction; extending a token with a
//! newly joined fact produces a new token. Identity is the ordered sequence
//! of fact keys: the same facts joined in a different order yield a
//! different token.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::fact::SharedFact;

/// An ordered, immutable sequence of facts representing a partial match.
///
/// The content hash is computed once at construction from the ordered fact
/// keys and acts as a fast identity check; equality always falls back to
/// exact comparison of the key sequence, so a hash collision can never
/// alias two distinct tokens.
#[derive(Clone)]
pub struct Token {
    facts: Vec<SharedFact>,
    hash: u64,
}

impl Token {
    /// Creates a token from an ordered sequence of facts.
    #[must_use]
    pub fn new(facts: Vec<SharedFact>) -> Self {
        let hash = content_hash(&facts);
        Self { facts, hash }
    }

    /// Creates a single-fact token, as produced by the alpha layer.
    #[must_use]
    pub fn single(fact: SharedFact) -> Self {
        Self::new(vec![fact])
    }

    /// Returns a new token with `fact` appended.
    ///
    /// The receiver is unchanged; extended-token identity is a pure
    /// function of the receiver and the appended fact, which is what makes
    /// retraction able to rebuild the exact token an earlier assert
    /// produced.
    #[must_use]
    pub fn extend(&self, fact: SharedFact) -> Self {
        let mut facts = self.facts.clone();
        facts.push(fact);
        Self::new(facts)
    }

    /// The facts in match order.
    #[must_use]
    pub fn facts(&self) -> &[SharedFact] {
        &self.facts
    }

    /// The 64-bit content hash over the ordered fact keys.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        self.hash
    }

    /// Number of facts in this token.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the token holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

fn content_hash(facts: &[SharedFact]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for fact in facts {
        fact.key().as_str().hash(&mut hasher);
    }
    hasher.finish()
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.facts.len() == other.facts.len()
            && self
                .facts
                .iter()
                .zip(other.facts.iter())
                .all(|(a, b)| a.key() == b.key())
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for fact in &self.facts {
            list.entry(&fact.key());
        }
        list.finish()
    }
}
