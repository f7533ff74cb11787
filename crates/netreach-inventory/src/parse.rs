use crate::error::MalformedRuleError;
use crate::records::{RawLayer4Config, RawPolicyRule, RawProtocolEntry, RawVpcRule};
use netreach_domain::model::{L4Filter, Rule};
use netreach_types::{Action, AddressRange, Direction, ParseError, PortRange, Protocol, ids};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

const ACTION_GOTO_NEXT: &str = "goto_next";

/// A validated VPC firewall rule plus the network URL it was attached to.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedVpcRule {
    pub rule: Rule,
    pub network: Option<String>,
}

/// A validated hierarchical policy rule plus the networks it is scoped to.
///
/// Empty `target_networks` means the rule applies to every network below the
/// attachment point.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedPolicyRule {
    pub rule: Rule,
    pub target_networks: Vec<String>,
}

pub fn parse_vpc_rule(value: &Value) -> Result<ParsedVpcRule, MalformedRuleError> {
    let label = record_label(value, "name");
    let raw = RawVpcRule::deserialize(value).map_err(|e| MalformedRuleError::Shape {
        rule: label.clone(),
        message: e.to_string(),
    })?;
    let field = |source: ParseError| MalformedRuleError::Field {
        rule: label.clone(),
        source,
    };

    let name = match raw.name.as_deref() {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => {
            return Err(MalformedRuleError::Incomplete {
                rule: label.clone(),
                message: "missing name".to_string(),
            });
        }
    };

    // The API defaults omitted VPC rule directions to ingress.
    let direction = match raw.direction.as_deref() {
        Some(d) => d.parse::<Direction>().map_err(field)?,
        None => Direction::Ingress,
    };
    let priority = raw.priority.unwrap_or(i64::from(ids::DEFAULT_PRIORITY));
    let priority = check_priority(&label, priority)?;

    let (action, entries) = match (raw.allowed.is_empty(), raw.denied.is_empty()) {
        (false, true) => (Action::Allow, &raw.allowed),
        (true, false) => (Action::Deny, &raw.denied),
        (false, false) => {
            return Err(MalformedRuleError::Incomplete {
                rule: label.clone(),
                message: "both allowed and denied are set".to_string(),
            });
        }
        (true, true) => {
            return Err(MalformedRuleError::Incomplete {
                rule: label.clone(),
                message: "neither allowed nor denied is set".to_string(),
            });
        }
    };

    let mut rule = Rule::new(&name, direction, action, priority);
    rule.filters = protocol_entries(entries).map_err(field)?;
    rule.source_ranges = ranges(&raw.source_ranges).map_err(field)?;
    rule.destination_ranges = ranges(&raw.destination_ranges).map_err(field)?;
    rule.source_tags = to_set(raw.source_tags);
    rule.target_tags = to_set(raw.target_tags);
    rule.source_service_accounts = to_set(raw.source_service_accounts);
    rule.target_service_accounts = to_set(raw.target_service_accounts);
    rule.disabled = raw.disabled;

    Ok(ParsedVpcRule {
        rule,
        network: raw.network,
    })
}

/// Parse one rule of a hierarchical firewall policy.
///
/// Returns `Ok(None)` for `goto_next` rules: they delegate to the next level
/// and never decide a flow themselves.
pub fn parse_policy_rule(value: &Value) -> Result<Option<ParsedPolicyRule>, MalformedRuleError> {
    let label = record_label(value, "description");
    let raw = RawPolicyRule::deserialize(value).map_err(|e| MalformedRuleError::Shape {
        rule: label.clone(),
        message: e.to_string(),
    })?;
    let field = |source: ParseError| MalformedRuleError::Field {
        rule: label.clone(),
        source,
    };

    let action = match raw.action.as_deref() {
        None => {
            return Err(MalformedRuleError::Incomplete {
                rule: label.clone(),
                message: "missing action".to_string(),
            });
        }
        Some(a) if a.eq_ignore_ascii_case(ACTION_GOTO_NEXT) => {
            tracing::debug!(rule = %label, "skipping goto_next rule");
            return Ok(None);
        }
        Some(a) => a.parse::<Action>().map_err(field)?,
    };
    let direction = match raw.direction.as_deref() {
        Some(d) => d.parse::<Direction>().map_err(field)?,
        None => {
            return Err(MalformedRuleError::Incomplete {
                rule: label.clone(),
                message: "missing direction".to_string(),
            });
        }
    };
    let Some(priority) = raw.priority else {
        return Err(MalformedRuleError::Incomplete {
            rule: label.clone(),
            message: "missing priority".to_string(),
        });
    };
    let priority = check_priority(&label, priority)?;

    let name = raw.description.unwrap_or_default();
    let mut rule = Rule::new(&name, direction, action, priority);
    rule.filters = layer4_configs(&raw.matcher.layer4_configs).map_err(field)?;
    rule.source_ranges = ranges(&raw.matcher.src_ip_ranges).map_err(field)?;
    rule.destination_ranges = ranges(&raw.matcher.dest_ip_ranges).map_err(field)?;
    rule.target_service_accounts = to_set(raw.target_service_accounts);
    rule.disabled = raw.disabled;

    Ok(Some(ParsedPolicyRule {
        rule,
        target_networks: raw.target_resources,
    }))
}

/// Best-effort identifier for error messages, read before the shape is trusted.
fn record_label(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| value.get("priority").map(|p| format!("<priority {p}>")))
        .unwrap_or_else(|| "<unnamed>".to_string())
}

fn check_priority(label: &str, priority: i64) -> Result<u16, MalformedRuleError> {
    if !(ids::PRIORITY_MIN..=ids::PRIORITY_MAX).contains(&priority) {
        return Err(MalformedRuleError::Priority {
            rule: label.to_string(),
            priority,
        });
    }
    u16::try_from(priority).map_err(|_| MalformedRuleError::Priority {
        rule: label.to_string(),
        priority,
    })
}

fn ranges(raw: &[String]) -> Result<Vec<AddressRange>, ParseError> {
    raw.iter().map(|s| s.parse()).collect()
}

fn ports(raw: &[String]) -> Result<Vec<PortRange>, ParseError> {
    raw.iter().map(|s| s.parse()).collect()
}

fn protocol_entries(raw: &[RawProtocolEntry]) -> Result<Vec<L4Filter>, ParseError> {
    raw.iter()
        .map(|e| {
            Ok(L4Filter {
                protocol: e.ip_protocol.parse::<Protocol>()?,
                ports: ports(&e.ports)?,
            })
        })
        .collect()
}

fn layer4_configs(raw: &[RawLayer4Config]) -> Result<Vec<L4Filter>, ParseError> {
    raw.iter()
        .map(|c| {
            Ok(L4Filter {
                protocol: c.ip_protocol.parse::<Protocol>()?,
                ports: ports(&c.ports)?,
            })
        })
        .collect()
}

fn to_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().filter(|v| !v.is_empty()).collect()
}
