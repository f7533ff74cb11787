//! Raw inventory records, shaped like the platform's JSON.
//!
//! Nothing here is validated. Rule bodies stay as `serde_json::Value` until
//! [`crate::parse`] turns them into domain rules one record at a time, so a
//! single bad entry never poisons a whole listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Project,
    Folder,
    Organization,
}

/// One node of a project's resource ancestry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn folder(id: impl Into<String>) -> Self {
        Self::new(ResourceKind::Folder, id)
    }

    pub fn organization(id: impl Into<String>) -> Self {
        Self::new(ResourceKind::Organization, id)
    }

    pub fn project(id: impl Into<String>) -> Self {
        Self::new(ResourceKind::Project, id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collection = match self.kind {
            ResourceKind::Project => "projects",
            ResourceKind::Folder => "folders",
            ResourceKind::Organization => "organizations",
        };
        write!(f, "{collection}/{}", self.id)
    }
}

/// Network metadata as listed for a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// A firewall policy attached to an organization or folder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFirewallPolicy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub rules: Vec<Value>,
}

impl RawFirewallPolicy {
    /// The human-facing name used in explanations: the first non-empty of
    /// short name, display name, resource name.
    pub fn label(&self) -> &str {
        [&self.short_name, &self.display_name]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

/// `allowed` / `denied` entry of a VPC firewall rule.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawProtocolEntry {
    #[serde(rename = "IPProtocol", alias = "ipProtocol")]
    pub ip_protocol: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawVpcRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub source_ranges: Vec<String>,
    #[serde(default)]
    pub destination_ranges: Vec<String>,
    #[serde(default)]
    pub source_tags: Vec<String>,
    #[serde(default)]
    pub target_tags: Vec<String>,
    #[serde(default)]
    pub source_service_accounts: Vec<String>,
    #[serde(default)]
    pub target_service_accounts: Vec<String>,
    #[serde(default)]
    pub allowed: Vec<RawProtocolEntry>,
    #[serde(default)]
    pub denied: Vec<RawProtocolEntry>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLayer4Config {
    pub ip_protocol: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRuleMatch {
    #[serde(default)]
    pub src_ip_ranges: Vec<String>,
    #[serde(default)]
    pub dest_ip_ranges: Vec<String>,
    #[serde(default)]
    pub layer4_configs: Vec<RawLayer4Config>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPolicyRule {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, rename = "match")]
    pub matcher: RawRuleMatch,
    #[serde(default)]
    pub target_service_accounts: Vec<String>,
    #[serde(default)]
    pub target_resources: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// True if `url` (a full network URL or a bare name) designates `network` in `project_id`.
pub fn network_url_matches(url: &str, project_id: &str, network: &str) -> bool {
    if !url.contains('/') {
        return url == network;
    }
    let suffix = format!("projects/{project_id}/global/networks/{network}");
    url.trim_end_matches('/').ends_with(&suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_refs_render_as_resource_names() {
        assert_eq!(ResourceRef::folder("123").to_string(), "folders/123");
        assert_eq!(
            ResourceRef::organization("456").to_string(),
            "organizations/456"
        );
    }

    #[test]
    fn resource_refs_deserialize_from_type_and_id() {
        let json = r#"{"type":"folder","id":"99"}"#;
        let r: ResourceRef = serde_json::from_str(json).expect("parse");
        assert_eq!(r, ResourceRef::folder("99"));
    }

    #[test]
    fn policy_label_prefers_short_name() {
        let mut p = RawFirewallPolicy {
            name: "1234567".to_string(),
            short_name: None,
            display_name: None,
            rules: Vec::new(),
        };
        assert_eq!(p.label(), "1234567");
        p.display_name = Some("org baseline".to_string());
        assert_eq!(p.label(), "org baseline");
        p.short_name = Some("baseline".to_string());
        assert_eq!(p.label(), "baseline");
    }

    #[test]
    fn policy_label_skips_empty_names() {
        let mut p = RawFirewallPolicy {
            name: "1234567".to_string(),
            short_name: Some(String::new()),
            display_name: Some("org baseline".to_string()),
            rules: Vec::new(),
        };
        assert_eq!(p.label(), "org baseline");
        p.display_name = Some(String::new());
        assert_eq!(p.label(), "1234567");
    }

    #[test]
    fn network_urls_match_by_suffix_or_bare_name() {
        let url = "https://www.googleapis.com/compute/v1/projects/p1/global/networks/default";
        assert!(network_url_matches(url, "p1", "default"));
        assert!(!network_url_matches(url, "p2", "default"));
        assert!(!network_url_matches(url, "p1", "prod"));
        assert!(network_url_matches("default", "p1", "default"));
        let sibling = "projects/p1/global/networks/default-2";
        assert!(!network_url_matches(sibling, "p1", "default"));
    }
}
