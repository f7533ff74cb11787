//! Inventory adapters: read resource records, validate firewall rules, and
//! assemble the policy chain of a (project, network).
//!
//! This crate is allowed to do IO through an [`Inventory`] implementation. It
//! never evaluates flows; that is the domain crate's job.

#![forbid(unsafe_code)]

mod cache;
mod error;
mod parse;
mod records;
mod resolve;
mod snapshot;
mod source;

pub use cache::ChainCache;
pub use error::{InventoryError, MalformedRuleError, ResolutionError};
pub use parse::{ParsedPolicyRule, ParsedVpcRule, parse_policy_rule, parse_vpc_rule};
pub use records::{
    NetworkRecord, RawFirewallPolicy, ResourceKind, ResourceRef, network_url_matches,
};
pub use resolve::resolve_chain;
pub use snapshot::SnapshotInventory;
pub use source::Inventory;

/// Fuzz-friendly API for exercising rule parsing on raw text.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a VPC firewall rule record.
    ///
    /// Returns `Err(...)` on invalid JSON or an invalid rule. **Never panics**.
    pub fn parse_vpc_rule_json(text: &str) -> Result<(), String> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        parse_vpc_rule(&value).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Parse arbitrary text as a hierarchical policy rule record.
    ///
    /// **Never panics** on any input.
    pub fn parse_policy_rule_json(text: &str) -> Result<(), String> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        parse_policy_rule(&value).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Parse arbitrary text as a whole inventory snapshot.
    pub fn parse_snapshot(text: &str) -> Result<(), String> {
        SnapshotInventory::from_json(text).map_err(|e| e.to_string())?;
        Ok(())
    }
}
