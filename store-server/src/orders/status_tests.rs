//! Transition-table unit tests (no storage involved)

use shared::models::OrderStatus;

use super::status::milestone_column;

use OrderStatus::*;

const LEGAL: [(OrderStatus, OrderStatus); 12] = [
    (Pending, Confirmed),
    (Pending, Cancelled),
    (Confirmed, Shipped),
    (Confirmed, Cancelled),
    (Shipped, Delivered),
    (Shipped, Confirmed),
    (Shipped, Cancelled),
    (Delivered, Delivered),
    (Delivered, Shipped),
    (Cancelled, Pending),
    (Cancelled, Confirmed),
    (Cancelled, Cancelled),
];

#[test]
fn every_legal_pair_is_accepted() {
    for (from, to) in LEGAL {
        assert!(from.can_transition_to(to), "{from} -> {to} should be legal");
    }
}

#[test]
fn every_pair_absent_from_the_table_is_rejected() {
    for from in OrderStatus::ALL {
        for to in OrderStatus::ALL {
            let expected = LEGAL.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{from} -> {to} legality mismatch"
            );
        }
    }
}

#[test]
fn milestones_map_to_their_columns() {
    assert_eq!(milestone_column(Pending), None);
    assert_eq!(milestone_column(Confirmed), Some("confirmed_at"));
    assert_eq!(milestone_column(Shipped), Some("shipped_at"));
    assert_eq!(milestone_column(Delivered), Some("delivered_at"));
    assert_eq!(milestone_column(Cancelled), Some("canceled_at"));
}
