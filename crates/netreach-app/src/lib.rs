//! Use case orchestration for netreach.
//!
//! This crate provides the application layer: the analysis run context, the
//! per-network firewall facade, and rendering of decisions and rule listings.
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod analysis;
mod error;
mod firewall;
mod load;
mod render;

pub use analysis::{Analysis, Network};
pub use error::AppError;
pub use firewall::{EgressParams, Firewall, IngressParams, RuleFilter};
pub use load::{LoadInput, SnapshotAnalysis, load_analysis};
pub use render::{RuleView, decision_exit_code, format_decision, format_filter, format_rules};
