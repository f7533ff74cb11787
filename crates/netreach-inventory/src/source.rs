use crate::error::InventoryError;
use crate::records::{NetworkRecord, RawFirewallPolicy, ResourceRef};
use serde_json::Value;

/// Read access to the resource inventory of one or more projects.
///
/// Implementations must be safe to share across threads: a single analysis
/// run may resolve chains for many networks concurrently.
pub trait Inventory: Send + Sync {
    /// Ancestry of `project_id`, leaf first: the project itself (optional),
    /// then folders from nearest to root-most, then the organization.
    fn project_ancestry(&self, project_id: &str) -> Result<Vec<ResourceRef>, InventoryError>;

    /// The firewall policy attached at `node`, if any.
    fn firewall_policy(
        &self,
        node: &ResourceRef,
    ) -> Result<Option<RawFirewallPolicy>, InventoryError>;

    fn networks(&self, project_id: &str) -> Result<Vec<NetworkRecord>, InventoryError>;

    /// Raw VPC firewall rule records of the project, across all its networks.
    fn vpc_firewall_rules(&self, project_id: &str) -> Result<Vec<Value>, InventoryError>;
}

impl<T: Inventory + ?Sized> Inventory for &T {
    fn project_ancestry(&self, project_id: &str) -> Result<Vec<ResourceRef>, InventoryError> {
        (**self).project_ancestry(project_id)
    }

    fn firewall_policy(
        &self,
        node: &ResourceRef,
    ) -> Result<Option<RawFirewallPolicy>, InventoryError> {
        (**self).firewall_policy(node)
    }

    fn networks(&self, project_id: &str) -> Result<Vec<NetworkRecord>, InventoryError> {
        (**self).networks(project_id)
    }

    fn vpc_firewall_rules(&self, project_id: &str) -> Result<Vec<Value>, InventoryError> {
        (**self).vpc_firewall_rules(project_id)
    }
}
