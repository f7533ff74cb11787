//! Property-based tests for the evaluator.
//!
//! These tests use proptest to verify invariants around:
//! - implicit defaults when nothing matches
//! - priority precedence and the deny-first tie-break
//! - determinism of repeated evaluation

use crate::config::{EffectiveConfig, TieBreak};
use crate::engine::{evaluate, evaluate_with};
use crate::model::{Policy, PolicyChain, Query, Rule};
use netreach_types::{Action, AddressRange, Direction, PolicyScope, Protocol, ids};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Allow), Just(Action::Deny)]
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Ingress), Just(Direction::Egress)]
}

fn arb_scope() -> impl Strategy<Value = PolicyScope> {
    prop_oneof![
        Just(PolicyScope::Organization),
        Just(PolicyScope::Folder),
        Just(PolicyScope::Network),
    ]
}

fn arb_protocol() -> impl Strategy<Value = Protocol> {
    prop_oneof![
        Just(Protocol::Tcp),
        Just(Protocol::Udp),
        Just(Protocol::Icmp),
        Just(Protocol::All),
    ]
}

fn arb_range() -> impl Strategy<Value = AddressRange> {
    (any::<u32>(), 0u8..=32).prop_map(|(bits, len)| {
        format!("{}/{len}", std::net::Ipv4Addr::from(bits))
            .parse()
            .expect("generated range must parse")
    })
}

fn arb_query() -> impl Strategy<Value = Query> {
    (
        arb_direction(),
        arb_protocol(),
        prop::option::of(1u16..=65535),
        prop::option::of(arb_range()),
    )
        .prop_map(|(direction, protocol, port, range)| {
            let mut q = Query::new(direction, protocol);
            q.port = port;
            q.range = range;
            q
        })
}

/// A selector-less rule in `direction`: matches every query in that direction.
fn catch_all(name: &str, direction: Direction, action: Action, priority: u16) -> Rule {
    Rule::new(name, direction, action, priority)
}

fn policy(name: &str, scope: PolicyScope, rules: Vec<Rule>) -> Policy {
    Policy {
        name: name.to_string(),
        scope,
        rules,
    }
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Ingress => Direction::Egress,
        Direction::Egress => Direction::Ingress,
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// With no matching rule: ingress denies, egress allows, and the explanation says so.
    #[test]
    fn no_match_yields_implicit_default(
        query in arb_query(),
        actions in prop::collection::vec((arb_action(), any::<u16>()), 0..8),
    ) {
        let rules = actions
            .into_iter()
            .enumerate()
            .map(|(i, (action, priority))| {
                catch_all(&format!("r{i}"), opposite(query.direction), action, priority)
            })
            .collect();
        let chain = PolicyChain::new(vec![policy("default", PolicyScope::Network, rules)]);

        let d = evaluate(&chain, &query);
        prop_assert_eq!(d.action, query.direction.implicit_action());
        prop_assert_eq!(d.matched_by.as_str(), ids::IMPLICIT_DEFAULT);
        prop_assert!(d.rule.is_none());
    }

    /// Equal priority, opposite actions, both matching: deny wins in any chain order.
    #[test]
    fn equal_priority_deny_always_wins(
        query in arb_query(),
        priority in any::<u16>(),
        scope_a in arb_scope(),
        scope_b in arb_scope(),
        deny_first in any::<bool>(),
    ) {
        let allow = catch_all("allow", query.direction, Action::Allow, priority);
        let deny = catch_all("deny", query.direction, Action::Deny, priority);
        let allow = policy("a", scope_a, vec![allow]);
        let deny = policy("b", scope_b, vec![deny]);
        let policies = if deny_first { vec![deny, allow] } else { vec![allow, deny] };

        let d = evaluate(&PolicyChain::new(policies), &query);
        prop_assert_eq!(d.action, Action::Deny);
    }

    /// A matching rule at a strictly lower priority always wins, whatever the actions.
    #[test]
    fn lower_priority_always_outranks(
        query in arb_query(),
        p1 in 0u16..65535,
        gap in 1u16..=1000,
        a1 in arb_action(),
        a2 in arb_action(),
        scope_1 in arb_scope(),
        scope_2 in arb_scope(),
        winner_first in any::<bool>(),
        hierarchy_first in any::<bool>(),
    ) {
        let p2 = p1.saturating_add(gap).max(p1 + 1);
        let winner = policy("winner", scope_1, vec![catch_all("w", query.direction, a1, p1)]);
        let loser = policy("loser", scope_2, vec![catch_all("l", query.direction, a2, p2)]);
        let policies = if winner_first { vec![winner, loser] } else { vec![loser, winner] };
        let cfg = EffectiveConfig {
            tie_break: if hierarchy_first { TieBreak::HierarchyFirst } else { TieBreak::Numeric },
            ..EffectiveConfig::default()
        };

        let d = evaluate_with(&PolicyChain::new(policies), &query, &cfg);
        prop_assert_eq!(d.action, a1);
        prop_assert_eq!(d.rule.map(|r| r.priority), Some(p1));
    }

    /// evaluate() is a pure function of its inputs.
    #[test]
    fn evaluation_is_deterministic(
        query in arb_query(),
        rules in prop::collection::vec(
            (arb_direction(), arb_action(), any::<u16>(), prop::option::of(arb_range())),
            0..12,
        ),
    ) {
        let rules: Vec<Rule> = rules
            .into_iter()
            .enumerate()
            .map(|(i, (direction, action, priority, range))| {
                let mut r = catch_all(&format!("r{i}"), direction, action, priority);
                if let Some(range) = range {
                    r.source_ranges.push(range);
                    r.destination_ranges.push(range);
                }
                r
            })
            .collect();
        let chain = PolicyChain::new(vec![policy("default", PolicyScope::Network, rules)]);

        let first = evaluate(&chain, &query);
        for _ in 0..3 {
            prop_assert_eq!(&evaluate(&chain, &query), &first);
        }
    }
}
