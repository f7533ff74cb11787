//! Inventory backed by a JSON snapshot file.
//!
//! ```json
//! {
//!   "projects": {
//!     "my-project": {
//!       "ancestry": [{"type": "project", "id": "my-project"}, {"type": "organization", "id": "1"}],
//!       "networks": [{"name": "default"}],
//!       "firewalls": [{"name": "allow-ssh", "allowed": [{"IPProtocol": "tcp", "ports": ["22"]}]}]
//!     }
//!   },
//!   "policies": {
//!     "organizations/1": {"name": "1001", "shortName": "baseline", "rules": []}
//!   }
//! }
//! ```

use crate::error::InventoryError;
use crate::records::{NetworkRecord, RawFirewallPolicy, ResourceRef};
use crate::source::Inventory;
use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectSnapshot {
    #[serde(default)]
    ancestry: Vec<ResourceRef>,
    #[serde(default)]
    networks: Vec<NetworkRecord>,
    #[serde(default)]
    firewalls: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotInventory {
    #[serde(default)]
    projects: BTreeMap<String, ProjectSnapshot>,
    /// Keyed by resource name, e.g. `folders/123`.
    #[serde(default)]
    policies: BTreeMap<String, RawFirewallPolicy>,
}

impl SnapshotInventory {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Utf8Path) -> Result<Self, InventoryError> {
        let text = std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.to_string(),
            source,
        })?;
        let inventory = Self::from_json(&text).map_err(|source| InventoryError::Decode {
            path: path.to_string(),
            source,
        })?;
        tracing::debug!(
            path = %path,
            projects = inventory.projects.len(),
            policies = inventory.policies.len(),
            "loaded inventory snapshot"
        );
        Ok(inventory)
    }

    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    fn project(&self, project_id: &str) -> Result<&ProjectSnapshot, InventoryError> {
        self.projects
            .get(project_id)
            .ok_or_else(|| InventoryError::NotFound(format!("project {project_id}")))
    }
}

impl Inventory for SnapshotInventory {
    fn project_ancestry(&self, project_id: &str) -> Result<Vec<ResourceRef>, InventoryError> {
        Ok(self.project(project_id)?.ancestry.clone())
    }

    fn firewall_policy(
        &self,
        node: &ResourceRef,
    ) -> Result<Option<RawFirewallPolicy>, InventoryError> {
        Ok(self.policies.get(&node.to_string()).cloned())
    }

    fn networks(&self, project_id: &str) -> Result<Vec<NetworkRecord>, InventoryError> {
        Ok(self.project(project_id)?.networks.clone())
    }

    fn vpc_firewall_rules(&self, project_id: &str) -> Result<Vec<Value>, InventoryError> {
        Ok(self.project(project_id)?.firewalls.clone())
    }
}
