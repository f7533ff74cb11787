//! Pure firewall policy evaluation (no IO).
//!
//! Input: a policy chain constructed elsewhere plus one query.
//! Output: a decision and the explanation of what produced it.

#![forbid(unsafe_code)]

pub mod config;
pub mod matcher;
pub mod model;

mod engine;

pub use engine::{Candidate, evaluate, evaluate_with, matching_rules};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod properties;
