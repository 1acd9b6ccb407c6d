//! Join node behavior: extension, symmetry, and retraction rebuilds.

use std::sync::Arc;

use trellis_network::{AlphaNode, JoinNode, LeftInput, Node, RightInput};

use crate::fixtures::{
    Probe, Signal, cart, cart_belongs_to_user, large_carts, user, vip_users,
};

/// Wires the canonical VIP-user/large-cart join and returns its pieces.
fn vip_cart_network() -> (Arc<AlphaNode>, Arc<AlphaNode>, Arc<Probe>) {
    let users = Arc::new(AlphaNode::new(vip_users()));
    let carts = Arc::new(AlphaNode::new(large_carts(100.0)));
    let join: Arc<JoinNode> = Arc::new(JoinNode::new(cart_belongs_to_user()));

    users.add_child(LeftInput::new(join.clone()));
    carts.add_child(RightInput::new(join.clone()));

    let probe = Probe::new();
    join.add_child(probe.clone());

    (users, carts, probe)
}

#[test]
fn token_then_fact_produces_extended_token() {
    let (users, carts, probe) = vip_cart_network();

    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&cart(101, 1, 150.0));

    assert_eq!(
        probe.events(),
        vec![Signal::AssertToken(vec![
            "User:1".to_string(),
            "Cart:101".to_string(),
        ])]
    );
}

#[test]
fn fact_then_token_is_symmetric() {
    let (users, carts, probe) = vip_cart_network();

    carts.assert_fact(&cart(101, 1, 150.0));
    users.assert_fact(&user(1, "VIP"));

    assert_eq!(
        probe.events(),
        vec![Signal::AssertToken(vec![
            "User:1".to_string(),
            "Cart:101".to_string(),
        ])]
    );
}

#[test]
fn each_matching_counterpart_extends_once() {
    let (users, carts, probe) = vip_cart_network();

    carts.assert_fact(&cart(101, 1, 150.0));
    carts.assert_fact(&cart(102, 1, 600.0));
    carts.assert_fact(&cart(103, 2, 900.0));
    users.assert_fact(&user(1, "VIP"));

    // Only the two carts belonging to user 1 pair up.
    assert_eq!(probe.token_asserts(), 2);
}

#[test]
fn mismatched_join_produces_nothing() {
    let (users, carts, probe) = vip_cart_network();

    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&cart(101, 2, 150.0));

    assert!(probe.events().is_empty());
}

#[test]
fn retracting_the_fact_retracts_the_extended_token() {
    let (users, carts, probe) = vip_cart_network();

    let c = cart(101, 1, 150.0);
    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&c);
    carts.retract_fact(&c);

    assert_eq!(
        probe.events(),
        vec![
            Signal::AssertToken(vec!["User:1".to_string(), "Cart:101".to_string()]),
            Signal::RetractToken(vec!["User:1".to_string(), "Cart:101".to_string()]),
        ]
    );
}

#[test]
fn retracting_the_left_fact_retracts_every_pairing() {
    let (users, carts, probe) = vip_cart_network();

    let vip = user(1, "VIP");
    users.assert_fact(&vip);
    carts.assert_fact(&cart(101, 1, 150.0));
    carts.assert_fact(&cart(102, 1, 600.0));

    users.retract_fact(&vip);

    assert_eq!(probe.token_asserts(), 2);
    assert_eq!(probe.token_retracts(), 2);
}

#[test]
fn duplicate_inputs_are_ignored_on_both_ports() {
    let (users, carts, probe) = vip_cart_network();

    users.assert_fact(&user(1, "VIP"));
    users.assert_fact(&user(1, "VIP"));
    carts.assert_fact(&cart(101, 1, 150.0));
    carts.assert_fact(&cart(101, 1, 150.0));

    assert_eq!(probe.token_asserts(), 1);
}
