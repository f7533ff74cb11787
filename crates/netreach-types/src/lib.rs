//! Stable value types shared across the netreach workspace.
//!
//! This crate is intentionally boring:
//! - flow vocabulary (direction, action, policy scope)
//! - layer-4 filters (protocols, port ranges)
//! - canonical address ranges
//! - the decision DTO handed back to callers

#![forbid(unsafe_code)]

pub mod decision;
pub mod error;
pub mod flow;
pub mod ids;
pub mod l4;
pub mod range;

pub use decision::{Decision, MatchedRule};
pub use error::ParseError;
pub use flow::{Action, Direction, PolicyScope};
pub use l4::{PortRange, Protocol};
pub use range::AddressRange;
