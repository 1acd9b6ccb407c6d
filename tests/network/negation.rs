//! Negation and existence nodes: boundary transitions and duality.

use std::sync::Arc;

use trellis_foundation::Fact;
use trellis_network::{AlphaNode, ExistenceNode, LeftInput, NegationNode, Node, RightInput};

use crate::fixtures::{Probe, Signal, cart, cart_belongs_to_user, user, vip_users};

fn negation_network() -> (Arc<AlphaNode>, Arc<AlphaNode>, Arc<Probe>) {
    let users = Arc::new(AlphaNode::new(vip_users()));
    let carts = Arc::new(AlphaNode::new(|_: &dyn Fact| true));
    let negation: Arc<NegationNode> = Arc::new(NegationNode::new(cart_belongs_to_user()));

    users.add_child(LeftInput::new(negation.clone()));
    carts.add_child(RightInput::new(negation.clone()));

    let probe = Probe::new();
    negation.add_child(probe.clone());

    (users, carts, probe)
}

fn existence_network() -> (Arc<AlphaNode>, Arc<AlphaNode>, Arc<Probe>) {
    let users = Arc::new(AlphaNode::new(vip_users()));
    let carts = Arc::new(AlphaNode::new(|_: &dyn Fact| true));
    let existence: Arc<ExistenceNode> = Arc::new(ExistenceNode::new(cart_belongs_to_user()));

    users.add_child(LeftInput::new(existence.clone()));
    carts.add_child(RightInput::new(existence.clone()));

    let probe = Probe::new();
    existence.add_child(probe.clone());

    (users, carts, probe)
}

fn user_token(id: u32) -> Signal {
    Signal::AssertToken(vec![format!("User:{id}")])
}

fn user_token_retract(id: u32) -> Signal {
    Signal::RetractToken(vec![format!("User:{id}")])
}

// =============================================================================
// Negation
// =============================================================================

#[test]
fn absence_propagates_immediately() {
    let (users, _carts, probe) = negation_network();

    users.assert_fact(&user(1, "VIP"));

    assert_eq!(probe.events(), vec![user_token(1)]);
}

#[test]
fn token_with_existing_match_is_withheld() {
    let (users, carts, probe) = negation_network();

    carts.assert_fact(&cart(101, 1, 50.0));
    users.assert_fact(&user(1, "VIP"));

    assert!(probe.events().is_empty());
}

#[test]
fn first_match_retracts_the_absence() {
    let (users, carts, probe) = negation_network();

    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&cart(101, 1, 50.0));

    assert_eq!(probe.events(), vec![user_token(1), user_token_retract(1)]);
}

#[test]
fn emission_happens_once_per_boundary_not_per_fact() {
    let (users, carts, probe) = negation_network();

    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&cart(101, 1, 50.0));
    carts.assert_fact(&cart(102, 1, 60.0));
    carts.assert_fact(&cart(103, 1, 70.0));

    // Three matches, one boundary crossing: exactly one retract.
    assert_eq!(probe.token_asserts(), 1);
    assert_eq!(probe.token_retracts(), 1);
}

#[test]
fn absence_is_restored_when_the_last_match_leaves() {
    let (users, carts, probe) = negation_network();

    let c1 = cart(101, 1, 50.0);
    let c2 = cart(102, 1, 60.0);
    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&c1);
    carts.assert_fact(&c2);

    carts.retract_fact(&c1);
    assert_eq!(probe.token_asserts(), 1);

    carts.retract_fact(&c2);
    assert_eq!(probe.token_asserts(), 2);
    assert_eq!(probe.events().last(), Some(&user_token(1)));
}

#[test]
fn retracting_a_propagated_token_retracts_downstream() {
    let (users, _carts, probe) = negation_network();

    let vip = user(1, "VIP");
    users.assert_fact(&vip);
    users.retract_fact(&vip);

    assert_eq!(probe.events(), vec![user_token(1), user_token_retract(1)]);
}

#[test]
fn retracting_a_withheld_token_stays_silent() {
    let (users, carts, probe) = negation_network();

    let vip = user(1, "VIP");
    carts.assert_fact(&cart(101, 1, 50.0));
    users.assert_fact(&vip);
    users.retract_fact(&vip);

    assert!(probe.events().is_empty());
}

// =============================================================================
// Existence
// =============================================================================

#[test]
fn existence_withholds_until_first_match() {
    let (users, carts, probe) = existence_network();

    users.assert_fact(&user(1, "VIP"));
    assert!(probe.events().is_empty());

    carts.assert_fact(&cart(101, 1, 50.0));
    assert_eq!(probe.events(), vec![user_token(1)]);
}

#[test]
fn existence_propagates_immediately_when_already_matched() {
    let (users, carts, probe) = existence_network();

    carts.assert_fact(&cart(101, 1, 50.0));
    users.assert_fact(&user(1, "VIP"));

    assert_eq!(probe.events(), vec![user_token(1)]);
}

#[test]
fn existence_is_lost_with_the_last_match() {
    let (users, carts, probe) = existence_network();

    let c1 = cart(101, 1, 50.0);
    let c2 = cart(102, 1, 60.0);
    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&c1);
    carts.assert_fact(&c2);

    carts.retract_fact(&c1);
    assert_eq!(probe.token_retracts(), 0);

    carts.retract_fact(&c2);
    assert_eq!(probe.events().last(), Some(&user_token_retract(1)));
}

// =============================================================================
// Duality
// =============================================================================

#[test]
fn negation_and_existence_emit_inverse_transitions() {
    let (not_users, not_carts, not_probe) = negation_network();
    let (ex_users, ex_carts, ex_probe) = existence_network();

    // Identical input sequence into both networks.
    let c = cart(101, 1, 50.0);
    not_users.assert_fact(&user(1, "VIP"));
    ex_users.assert_fact(&user(1, "VIP"));
    not_carts.assert_fact(&c);
    ex_carts.assert_fact(&c);
    not_carts.retract_fact(&c);
    ex_carts.retract_fact(&c);

    // Negation: assert (absent), retract (match), assert (restored).
    assert_eq!(
        not_probe.events(),
        vec![user_token(1), user_token_retract(1), user_token(1)]
    );
    // Existence: assert (match), retract (lost), inverse transitions at
    // every boundary.
    assert_eq!(
        ex_probe.events(),
        vec![user_token(1), user_token_retract(1)]
    );
}
