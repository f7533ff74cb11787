use crate::model::{L4Filter, Policy, PolicyChain, Rule};
use netreach_types::{Action, AddressRange, Direction, PolicyScope, Protocol};

pub fn range(s: &str) -> AddressRange {
    s.parse().expect("test range must parse")
}

pub fn tcp_rule(
    name: &str,
    direction: Direction,
    action: Action,
    priority: u16,
    ports: &[&str],
) -> Rule {
    let mut rule = Rule::new(name, direction, action, priority);
    rule.filters.push(L4Filter {
        protocol: Protocol::Tcp,
        ports: ports
            .iter()
            .map(|p| p.parse().expect("test port must parse"))
            .collect(),
    });
    rule
}

pub fn network_policy(name: &str, rules: Vec<Rule>) -> Policy {
    Policy {
        name: name.to_string(),
        scope: PolicyScope::Network,
        rules,
    }
}

pub fn chain(policies: Vec<Policy>) -> PolicyChain {
    PolicyChain::new(policies)
}
