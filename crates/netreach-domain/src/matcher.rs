//! Pure predicates between a query and a single rule.

use crate::model::{L4Filter, Query, Rule};
use netreach_types::{AddressRange, PortRange, Protocol};
use std::collections::BTreeSet;

/// True iff the query range shares at least one address with any rule range.
///
/// An empty rule range set matches everything, as does an absent query range.
pub fn range_overlaps(query: Option<&AddressRange>, rule_ranges: &[AddressRange]) -> bool {
    if rule_ranges.is_empty() {
        return true;
    }
    match query {
        None => true,
        Some(q) => rule_ranges.iter().any(|r| q.overlaps(r)),
    }
}

/// Protocol and port applicability of one rule filter.
///
/// - `all` on either side matches every protocol
/// - empty `rule_ports` matches every port
/// - an unset query port matches any rule of the same protocol
pub fn port_matches(
    query_protocol: Protocol,
    query_port: Option<u16>,
    rule_protocol: Protocol,
    rule_ports: &[PortRange],
) -> bool {
    if !rule_protocol.matches(query_protocol) {
        return false;
    }
    if rule_ports.is_empty() || !rule_protocol.has_ports() {
        return true;
    }
    match query_port {
        None => true,
        Some(port) => rule_ports.iter().any(|r| r.contains(port)),
    }
}

fn filters_match(query: &Query, filters: &[L4Filter]) -> bool {
    if filters.is_empty() {
        return true;
    }
    filters
        .iter()
        .any(|f| port_matches(query.protocol, query.port, f.protocol, &f.ports))
}

fn side_matches(
    rule_tags: &BTreeSet<String>,
    rule_accounts: &BTreeSet<String>,
    query_tags: &BTreeSet<String>,
    query_account: Option<&str>,
) -> bool {
    if rule_tags.is_empty() && rule_accounts.is_empty() {
        return true;
    }
    let tag_hit = !rule_tags.is_disjoint(query_tags);
    let account_hit = query_account.is_some_and(|a| rule_accounts.contains(a));
    tag_hit || account_hit
}

/// Tag/service-account applicability.
///
/// Each side (source, target) that carries selectors must be satisfied by an
/// intersecting tag or an exact service-account match. Selector-less sides are wildcards.
pub fn identity_matches(query: &Query, rule: &Rule) -> bool {
    side_matches(
        &rule.source_tags,
        &rule.source_service_accounts,
        &query.source_tags,
        query.source_service_account.as_deref(),
    ) && side_matches(
        &rule.target_tags,
        &rule.target_service_accounts,
        &query.target_tags,
        query.target_service_account.as_deref(),
    )
}

pub fn rule_matches(query: &Query, rule: &Rule) -> bool {
    rule.direction == query.direction
        && !rule.disabled
        && filters_match(query, &rule.filters)
        && range_overlaps(query.range.as_ref(), rule.ranges_for(query.direction))
        && identity_matches(query, rule)
}
