//! Token identity: ordered, immutable, hash-accelerated.

use std::any::Any;
use std::sync::Arc;

use proptest::prelude::*;
use trellis_foundation::{Fact, FactKey, SharedFact, Token};

#[derive(Debug)]
struct Labeled(String);

impl Fact for Labeled {
    fn key(&self) -> FactKey {
        self.0.as_str().into()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn fact(key: &str) -> SharedFact {
    Arc::new(Labeled(key.to_string()))
}

#[test]
fn same_facts_in_reversed_order_are_distinct_tokens() {
    let ab = Token::new(vec![fact("A"), fact("B")]);
    let ba = Token::new(vec![fact("B"), fact("A")]);

    assert_ne!(ab, ba);
    assert_ne!(ab.content_hash(), ba.content_hash());
}

#[test]
fn identity_depends_on_keys_not_instances() {
    // Two distinct allocations with the same keys are the same token.
    let t1 = Token::new(vec![fact("A"), fact("B")]);
    let t2 = Token::new(vec![fact("A"), fact("B")]);

    assert_eq!(t1, t2);
    assert_eq!(t1.content_hash(), t2.content_hash());
}

#[test]
fn extend_builds_the_same_identity_as_direct_construction() {
    let direct = Token::new(vec![fact("A"), fact("B"), fact("C")]);
    let chained = Token::single(fact("A")).extend(fact("B")).extend(fact("C"));

    assert_eq!(direct, chained);
}

#[test]
fn extend_never_mutates_the_receiver() {
    let base = Token::new(vec![fact("A")]);
    let hash_before = base.content_hash();

    let _longer = base.extend(fact("B"));

    assert_eq!(base.len(), 1);
    assert_eq!(base.content_hash(), hash_before);
}

proptest! {
    #[test]
    fn prefix_extension_is_associative(
        keys in proptest::collection::vec("[A-Za-z0-9:]{1,12}", 2..8)
    ) {
        // Building fact-by-fact and building all at once agree.
        let all: Vec<SharedFact> = keys.iter().map(|k| fact(k)).collect();
        let direct = Token::new(all.clone());

        let mut iter = all.into_iter();
        let mut chained = Token::single(iter.next().unwrap());
        for f in iter {
            chained = chained.extend(f);
        }

        prop_assert_eq!(direct, chained);
    }

    #[test]
    fn distinct_key_sequences_get_distinct_tokens(
        a in proptest::collection::vec("[a-z]{1,6}", 1..5),
        b in proptest::collection::vec("[a-z]{1,6}", 1..5)
    ) {
        prop_assume!(a != b);
        let ta = Token::new(a.iter().map(|k| fact(k)).collect());
        let tb = Token::new(b.iter().map(|k| fact(k)).collect());
        prop_assert_ne!(ta, tb);
    }
}
