//! The `load` use case: resolve configuration and open an inventory snapshot.

use crate::analysis::Analysis;
use anyhow::Context;
use camino::Utf8Path;
use netreach_inventory::SnapshotInventory;
use netreach_settings::{NetreachConfigV1, Overrides};

/// An analysis run over a JSON inventory snapshot.
pub type SnapshotAnalysis = Analysis<SnapshotInventory>;

/// Input for [`load_analysis`].
#[derive(Clone, Debug)]
pub struct LoadInput<'a> {
    /// Path of the JSON inventory snapshot.
    pub inventory_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

pub fn load_analysis(input: LoadInput<'_>) -> anyhow::Result<SnapshotAnalysis> {
    // Empty config is allowed, defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        NetreachConfigV1::default()
    } else {
        netreach_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        netreach_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let inventory = SnapshotInventory::load(input.inventory_path)
        .with_context(|| format!("load inventory {}", input.inventory_path))?;

    tracing::debug!(
        profile = %resolved.effective.profile,
        tie_break = ?resolved.effective.tie_break,
        malformed_rules = ?resolved.effective.malformed_rules,
        "configuration resolved"
    );
    Ok(Analysis::new(inventory, resolved.effective))
}
