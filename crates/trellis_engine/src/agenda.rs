//! The agenda: conflict resolution and activation dispensing.
//!
//! Activations accumulate while facts cascade through the network and are
//! dispensed one at a time. Ordering is resolved lazily: adds only mark
//! the agenda dirty, and the next pop performs a full sort. Entries go
//! from pending to fired; fired entries are removed and never revisited.

use std::sync::Mutex;

use trellis_foundation::Token;
use trellis_network::{ActivationAction, ActivationSink};

/// A pending rule firing.
///
/// Created by a terminal node when a token completes a match; consumed by
/// [`Agenda::next`]. The sequence number is a per-agenda monotonic counter
/// standing in for a creation timestamp, which keeps the last-in-first-out
/// tie-break deterministic.
pub struct Activation {
    rule_name: String,
    token: Token,
    action: ActivationAction,
    salience: i32,
    specificity: usize,
    sequence: u64,
}

impl Activation {
    /// The rule this activation fires.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// The fully matched token.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The rule's static priority.
    #[must_use]
    pub fn salience(&self) -> i32 {
        self.salience
    }

    /// Number of conditions the rule matched.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.specificity
    }

    /// Runs the bound action, consuming the activation.
    pub fn fire(self) {
        (self.action)();
    }

    /// Comparison key: salience, then specificity, then recency.
    fn priority(&self) -> (i32, usize, u64) {
        (self.salience, self.specificity, self.sequence)
    }
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation")
            .field("rule_name", &self.rule_name)
            .field("token", &self.token)
            .field("salience", &self.salience)
            .field("specificity", &self.specificity)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct AgendaState {
    pending: Vec<Activation>,
    dirty: bool,
    next_sequence: u64,
}

/// Ordered collection of pending activations.
///
/// Conflict resolution, in priority order: salience descending,
/// specificity descending, creation order descending (last in, first out
/// among otherwise tied activations). Safe for concurrent producers; a
/// single mutex guards the pending list so `add` and the sort-then-pop in
/// `next` cannot interleave.
#[derive(Default)]
pub struct Agenda {
    state: Mutex<AgendaState>,
}

impl Agenda {
    /// Creates an empty agenda.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending activation and marks the agenda for resorting.
    pub fn add(
        &self,
        rule: &str,
        token: Token,
        action: ActivationAction,
        salience: i32,
        specificity: usize,
    ) {
        let mut state = self.state.lock().expect("agenda lock poisoned");
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.pending.push(Activation {
            rule_name: rule.to_string(),
            token,
            action,
            salience,
            specificity,
            sequence,
        });
        state.dirty = true;
    }

    /// Dispenses the highest-priority pending activation, or `None` when
    /// the agenda is empty.
    pub fn next(&self) -> Option<Activation> {
        let mut state = self.state.lock().expect("agenda lock poisoned");
        if state.dirty {
            // Ascending sort leaves the winner at the tail for an O(1) pop.
            state.pending.sort_by_key(Activation::priority);
            state.dirty = false;
        }
        state.pending.pop()
    }

    /// Removes the first pending activation matching this rule name and
    /// token. Returns false if none matches.
    ///
    /// Terminal nodes do not withdraw activations on token retraction;
    /// this is the explicit workflow for callers that need it.
    pub fn remove(&self, rule: &str, token: &Token) -> bool {
        let mut state = self.state.lock().expect("agenda lock poisoned");
        let found = state
            .pending
            .iter()
            .position(|a| a.rule_name == rule && a.token == *token);
        match found {
            Some(index) => {
                state.pending.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of pending activations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().expect("agenda lock poisoned").pending.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards all pending activations.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("agenda lock poisoned");
        state.pending.clear();
        state.dirty = false;
    }
}

impl ActivationSink for Agenda {
    fn add(
        &self,
        rule: &str,
        token: Token,
        action: ActivationAction,
        salience: i32,
        specificity: usize,
    ) {
        Agenda::add(self, rule, token, action, salience, specificity);
    }
}
