//! Agenda conflict resolution: salience, specificity, recency.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use trellis_engine::Agenda;
use trellis_foundation::Token;

use crate::fixtures::user;

fn token(id: u32) -> Token {
    Token::single(user(id, "VIP"))
}

fn noop() -> Box<dyn FnOnce() + Send> {
    Box::new(|| {})
}

#[test]
fn composite_ordering_salience_specificity_recency() {
    let agenda = Agenda::new();
    agenda.add("a", token(1), noop(), 100, 1);
    agenda.add("b", token(2), noop(), 50, 2);
    agenda.add("c", token(3), noop(), 50, 2);
    agenda.add("d", token(4), noop(), 10, 3);

    // Salience first; at equal salience and specificity, last in wins.
    let order: Vec<String> = std::iter::from_fn(|| agenda.next())
        .map(|a| a.rule_name().to_string())
        .collect();
    assert_eq!(order, vec!["a", "c", "b", "d"]);
}

#[test]
fn specificity_breaks_salience_ties() {
    let agenda = Agenda::new();
    agenda.add("broad", token(1), noop(), 10, 1);
    agenda.add("narrow", token(2), noop(), 10, 4);

    assert_eq!(agenda.next().unwrap().rule_name(), "narrow");
    assert_eq!(agenda.next().unwrap().rule_name(), "broad");
}

#[test]
fn adds_between_pops_resort() {
    let agenda = Agenda::new();
    agenda.add("low", token(1), noop(), 1, 1);
    agenda.add("mid", token(2), noop(), 5, 1);

    assert_eq!(agenda.next().unwrap().rule_name(), "mid");

    // A higher-salience arrival after the first pop still wins the next.
    agenda.add("high", token(3), noop(), 9, 1);
    assert_eq!(agenda.next().unwrap().rule_name(), "high");
    assert_eq!(agenda.next().unwrap().rule_name(), "low");
}

#[test]
fn fire_runs_the_bound_action() {
    let agenda = Agenda::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    agenda.add(
        "count",
        token(1),
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
        0,
        1,
    );

    agenda.next().unwrap().fire();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(agenda.is_empty());
}

#[test]
fn remove_targets_rule_and_token() {
    let agenda = Agenda::new();
    agenda.add("r1", token(1), noop(), 0, 1);
    agenda.add("r1", token(2), noop(), 0, 1);
    agenda.add("r2", token(1), noop(), 0, 1);

    assert!(agenda.remove("r1", &token(1)));
    assert_eq!(agenda.len(), 2);

    // Only the first matching entry goes per call.
    assert!(!agenda.remove("r1", &token(1)));
    assert!(agenda.remove("r2", &token(1)));
    assert!(agenda.remove("r1", &token(2)));
    assert!(agenda.is_empty());
}

#[test]
fn clear_resets_the_agenda() {
    let agenda = Agenda::new();
    agenda.add("r", token(1), noop(), 0, 1);
    agenda.add("r", token(2), noop(), 0, 1);
    assert_eq!(agenda.len(), 2);

    agenda.clear();
    assert!(agenda.is_empty());
    assert!(agenda.next().is_none());
}
