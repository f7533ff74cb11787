use crate::error::{MalformedRuleError, ResolutionError};
use crate::parse::{parse_policy_rule, parse_vpc_rule};
use crate::records::{RawFirewallPolicy, ResourceKind, ResourceRef, network_url_matches};
use crate::source::Inventory;
use netreach_domain::config::{EffectiveConfig, MalformedRules};
use netreach_domain::model::{Policy, PolicyChain, Rule};
use netreach_types::PolicyScope;

/// Assemble the policy chain that governs `network` in `project_id`.
///
/// The chain is ordered organization, folders root-most first, then the
/// network's own VPC firewall rules. Nodes without an attached policy are
/// skipped. Malformed rules are dropped with a warning or fail the whole
/// resolution, depending on `cfg.malformed_rules`.
pub fn resolve_chain(
    inventory: &dyn Inventory,
    project_id: &str,
    network: &str,
    cfg: &EffectiveConfig,
) -> Result<PolicyChain, ResolutionError> {
    let ancestry = inventory
        .project_ancestry(project_id)
        .map_err(|e| ResolutionError::Ancestry {
            project: project_id.to_string(),
            message: e.to_string(),
        })?;

    let mut policies = Vec::new();
    for node in hierarchy_root_first(&ancestry) {
        let attached = inventory
            .firewall_policy(node)
            .map_err(|e| ResolutionError::Policy {
                node: node.to_string(),
                message: e.to_string(),
            })?;
        let Some(raw) = attached else {
            tracing::trace!(node = %node, "no firewall policy attached");
            continue;
        };
        let scope = match node.kind {
            ResourceKind::Organization => PolicyScope::Organization,
            _ => PolicyScope::Folder,
        };
        let policy = hierarchical_policy(&raw, scope, project_id, network, cfg)?;
        policies.push(policy);
    }

    let networks = inventory
        .networks(project_id)
        .map_err(|e| ResolutionError::Network {
            project: project_id.to_string(),
            message: e.to_string(),
        })?;
    if !networks.iter().any(|n| n.name == network) {
        return Err(ResolutionError::NetworkNotFound {
            project: project_id.to_string(),
            network: network.to_string(),
        });
    }

    policies.push(network_policy(inventory, project_id, network, cfg)?);

    let chain = PolicyChain::new(policies);
    tracing::debug!(
        project = project_id,
        network,
        policies = chain.policies().len(),
        rules = chain.rules().count(),
        "resolved policy chain"
    );
    Ok(chain)
}

/// Folder and organization nodes of a leaf-first ancestry, root-most first.
fn hierarchy_root_first(ancestry: &[ResourceRef]) -> impl Iterator<Item = &ResourceRef> {
    ancestry
        .iter()
        .rev()
        .filter(|node| node.kind != ResourceKind::Project)
}

fn hierarchical_policy(
    raw: &RawFirewallPolicy,
    scope: PolicyScope,
    project_id: &str,
    network: &str,
    cfg: &EffectiveConfig,
) -> Result<Policy, ResolutionError> {
    let name = raw.label().to_string();
    let here = |url: &String| network_url_matches(url, project_id, network);
    let mut rules = Vec::with_capacity(raw.rules.len());
    for value in &raw.rules {
        let Some(Some(parsed)) = admit(parse_policy_rule(value), &name, cfg)? else {
            continue;
        };
        let targets = &parsed.target_networks;
        if targets.is_empty() || targets.iter().any(here) {
            rules.push(parsed.rule);
        }
    }
    Ok(Policy { name, scope, rules })
}

fn network_policy(
    inventory: &dyn Inventory,
    project_id: &str,
    network: &str,
    cfg: &EffectiveConfig,
) -> Result<Policy, ResolutionError> {
    let records = inventory
        .vpc_firewall_rules(project_id)
        .map_err(|e| ResolutionError::Rules {
            project: project_id.to_string(),
            message: e.to_string(),
        })?;

    let mut rules: Vec<Rule> = Vec::new();
    for value in &records {
        let Some(parsed) = admit(parse_vpc_rule(value), network, cfg)? else {
            continue;
        };
        let on_network = parsed
            .network
            .as_deref()
            .is_none_or(|url| network_url_matches(url, project_id, network));
        if on_network {
            rules.push(parsed.rule);
        }
    }

    Ok(Policy {
        name: network.to_string(),
        scope: PolicyScope::Network,
        rules,
    })
}

/// Apply the malformed-rule handling mode to one parse result.
fn admit<T>(
    parsed: Result<T, MalformedRuleError>,
    policy: &str,
    cfg: &EffectiveConfig,
) -> Result<Option<T>, ResolutionError> {
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(err) => match cfg.malformed_rules {
            MalformedRules::Drop => {
                tracing::warn!(policy, error = %err, "dropping malformed firewall rule");
                Ok(None)
            }
            MalformedRules::Reject => Err(ResolutionError::MalformedRule {
                policy: policy.to_string(),
                source: err,
            }),
        },
    }
}
