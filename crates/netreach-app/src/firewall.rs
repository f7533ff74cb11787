//! Connectivity checks and rule enumeration for one network.

use crate::error::AppError;
use globset::{Glob, GlobMatcher};
use netreach_domain::config::EffectiveConfig;
use netreach_domain::evaluate_with;
use netreach_domain::model::{PolicyChain, Query, Rule};
use netreach_types::{AddressRange, Decision, Direction, Protocol};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The effective firewall of a network: its resolved chain plus the run config.
#[derive(Clone, Debug)]
pub struct Firewall {
    chain: Arc<PolicyChain>,
    config: EffectiveConfig,
}

/// An inbound flow to a VM of the network.
#[derive(Clone, Debug)]
pub struct IngressParams {
    pub protocol: Protocol,
    pub port: Option<u16>,
    /// Where the traffic comes from; `None` is any address.
    pub source_range: Option<AddressRange>,
    pub source_tags: Vec<String>,
    pub source_service_account: Option<String>,
    pub target_tags: Vec<String>,
    pub target_service_account: Option<String>,
}

/// An outbound flow from a VM of the network.
#[derive(Clone, Debug)]
pub struct EgressParams {
    pub protocol: Protocol,
    pub port: Option<u16>,
    /// Where the traffic goes; `None` is any address.
    pub destination_range: Option<AddressRange>,
    /// Tags and service account of the sending VM.
    pub target_tags: Vec<String>,
    pub target_service_account: Option<String>,
}

impl IngressParams {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            port: None,
            source_range: None,
            source_tags: Vec::new(),
            source_service_account: None,
            target_tags: Vec::new(),
            target_service_account: None,
        }
    }
}

impl EgressParams {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            port: None,
            destination_range: None,
            target_tags: Vec::new(),
            target_service_account: None,
        }
    }
}

/// Selection for [`Firewall::get_vpc_ingress_rules`] and its egress twin.
/// Unset fields select everything.
#[derive(Clone, Debug, Default)]
pub struct RuleFilter {
    /// Glob over the rule name, e.g. `allow-*`.
    pub name_pattern: Option<String>,
    pub name: Option<String>,
    /// Keep rules whose target tags intersect this set.
    pub target_tags: Vec<String>,
}

impl Firewall {
    pub fn new(chain: Arc<PolicyChain>, config: EffectiveConfig) -> Self {
        Self { chain, config }
    }

    pub fn chain(&self) -> &PolicyChain {
        &self.chain
    }

    pub fn shared_chain(&self) -> Arc<PolicyChain> {
        Arc::clone(&self.chain)
    }

    pub fn check_connectivity_ingress(&self, params: &IngressParams) -> Decision {
        let query = Query {
            direction: Direction::Ingress,
            protocol: params.protocol,
            port: params.port,
            range: params.source_range,
            source_tags: params.source_tags.iter().cloned().collect(),
            target_tags: params.target_tags.iter().cloned().collect(),
            source_service_account: params.source_service_account.clone(),
            target_service_account: params.target_service_account.clone(),
        };
        self.check(&query)
    }

    pub fn check_connectivity_egress(&self, params: &EgressParams) -> Decision {
        let query = Query {
            direction: Direction::Egress,
            protocol: params.protocol,
            port: params.port,
            range: params.destination_range,
            source_tags: BTreeSet::new(),
            target_tags: params.target_tags.iter().cloned().collect(),
            source_service_account: None,
            target_service_account: params.target_service_account.clone(),
        };
        self.check(&query)
    }

    /// Evaluate an already assembled query against this firewall.
    pub fn check(&self, query: &Query) -> Decision {
        evaluate_with(&self.chain, query, &self.config)
    }

    pub fn get_vpc_ingress_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>, AppError> {
        self.vpc_rules(Direction::Ingress, filter)
    }

    pub fn get_vpc_egress_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>, AppError> {
        self.vpc_rules(Direction::Egress, filter)
    }

    /// Network-level rules in `direction`, ordered by priority then name.
    fn vpc_rules(&self, direction: Direction, filter: &RuleFilter) -> Result<Vec<Rule>, AppError> {
        let matcher = filter
            .name_pattern
            .as_deref()
            .map(compile_pattern)
            .transpose()?;
        let wanted_tags: BTreeSet<&str> = filter.target_tags.iter().map(String::as_str).collect();

        let Some(policy) = self.chain.network_policy() else {
            return Ok(Vec::new());
        };
        let mut rules: Vec<Rule> = policy
            .rules
            .iter()
            .filter(|r| r.direction == direction)
            .filter(|r| filter.name.as_deref().is_none_or(|n| r.name == n))
            .filter(|r| matcher.as_ref().is_none_or(|m| m.is_match(&r.name)))
            .filter(|r| has_any_tag(r, &wanted_tags))
            .cloned()
            .collect();
        rules.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(rules)
    }
}

fn has_any_tag(rule: &Rule, tags: &BTreeSet<&str>) -> bool {
    tags.is_empty() || rule.target_tags.iter().any(|t| tags.contains(t.as_str()))
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, AppError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| AppError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
