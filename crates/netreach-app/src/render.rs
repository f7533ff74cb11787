use netreach_domain::model::{L4Filter, Rule};
use netreach_types::{Action, Decision, Direction};
use serde::Serialize;

/// JSON view of a rule for rule listings.
#[derive(Clone, Debug, Serialize)]
pub struct RuleView {
    pub name: String,
    pub priority: u16,
    pub direction: Direction,
    pub action: Action,
    pub filters: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_ranges: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destination_ranges: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_service_accounts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_service_accounts: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl From<&Rule> for RuleView {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name.clone(),
            priority: rule.priority,
            direction: rule.direction,
            action: rule.action,
            filters: rule.filters.iter().map(format_filter).collect(),
            source_ranges: rule.source_ranges.iter().map(ToString::to_string).collect(),
            destination_ranges: rule
                .destination_ranges
                .iter()
                .map(ToString::to_string)
                .collect(),
            source_tags: rule.source_tags.iter().cloned().collect(),
            target_tags: rule.target_tags.iter().cloned().collect(),
            source_service_accounts: rule.source_service_accounts.iter().cloned().collect(),
            target_service_accounts: rule.target_service_accounts.iter().cloned().collect(),
            disabled: rule.disabled,
        }
    }
}

/// `tcp:22,8000-8080`, or just the protocol when every port is allowed.
pub fn format_filter(filter: &L4Filter) -> String {
    if filter.ports.is_empty() {
        return filter.protocol.to_string();
    }
    let ports: Vec<String> = filter.ports.iter().map(ToString::to_string).collect();
    format!("{}:{}", filter.protocol, ports.join(","))
}

pub fn format_decision(decision: &Decision) -> String {
    let mut out = String::new();
    out.push_str(decision.action.as_str());
    out.push('\n');
    out.push_str(&format!("  matched by: {}\n", decision.matched_by));
    if let Some(rule) = &decision.rule {
        out.push_str(&format!("  scope:      {}\n", rule.scope));
        out.push_str(&format!("  priority:   {}\n", rule.priority));
    }
    out
}

/// One line per rule: priority, action, name, protocols, then any selectors.
pub fn format_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "No matching rules.\n".to_string();
    }

    let mut out = String::new();
    for r in rules {
        let filters = if r.filters.is_empty() {
            "all".to_string()
        } else {
            r.filters
                .iter()
                .map(format_filter)
                .collect::<Vec<_>>()
                .join(" ")
        };
        out.push_str(&format!(
            "{:<5}  {:<5}  {}  {}",
            r.priority,
            r.action.as_str(),
            r.name,
            filters
        ));

        let ranges = r.ranges_for(r.direction);
        if !ranges.is_empty() {
            let ranges: Vec<String> = ranges.iter().map(ToString::to_string).collect();
            out.push_str(&format!("  ranges={}", ranges.join(",")));
        }
        push_set(&mut out, "source-tags", r.source_tags.iter());
        push_set(&mut out, "target-tags", r.target_tags.iter());
        push_set(&mut out, "source-sa", r.source_service_accounts.iter());
        push_set(&mut out, "target-sa", r.target_service_accounts.iter());
        if r.disabled {
            out.push_str("  (disabled)");
        }
        out.push('\n');
    }
    out
}

fn push_set<'a>(out: &mut String, label: &str, values: impl Iterator<Item = &'a String>) {
    let values: Vec<&str> = values.map(String::as_str).collect();
    if !values.is_empty() {
        out.push_str(&format!("  {label}={}", values.join(",")));
    }
}

/// Exit code for a connectivity check: 0 when allowed, 2 when denied.
pub fn decision_exit_code(decision: &Decision) -> i32 {
    match decision.action {
        Action::Allow => 0,
        Action::Deny => 2,
    }
}
