//! Developer tasks (schema generation, fixture checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use netreach_inventory::{Inventory, SnapshotInventory, parse_policy_rule, parse_vpc_rule};
use schemars::schema_for;
use std::fs;

/// Get the project root (parent of xtask directory).
fn project_root() -> Utf8PathBuf {
    let manifest_dir = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest_dir.parent() {
        Some(parent) if manifest_dir.ends_with("xtask") => parent.to_path_buf(),
        _ => manifest_dir,
    }
}

fn schemas_dir() -> Utf8PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> Utf8PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(netreach_settings::NetreachConfigV1)
}

fn generate_decision_schema() -> schemars::Schema {
    schema_for!(netreach_types::Decision)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "netreach.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "netreach.decision.v1.json",
            generate: generate_decision_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("Failed to write schema to {path}"))?;
        println!("Wrote {path}");
    }
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            _ => stale.push(spec.filename),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    eprintln!("Missing or out of date schemas:");
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Every rule in a fixture snapshot must parse, except in fixtures named `malformed_*`.
fn check_fixture(dir: &Utf8Path) -> anyhow::Result<usize> {
    let path = dir.join("inventory.json");
    let inventory = SnapshotInventory::load(&path)?;
    let lenient = dir.file_name().is_some_and(|n| n.starts_with("malformed_"));

    let mut checked = 0;
    let mut failures = Vec::new();
    for project in inventory.project_ids() {
        for value in inventory.vpc_firewall_rules(project)? {
            checked += 1;
            if let Err(e) = parse_vpc_rule(&value) {
                failures.push(e.to_string());
            }
        }
        for node in inventory.project_ancestry(project)? {
            let Some(policy) = inventory.firewall_policy(&node)? else {
                continue;
            };
            for value in &policy.rules {
                checked += 1;
                if let Err(e) = parse_policy_rule(value) {
                    failures.push(e.to_string());
                }
            }
        }
    }

    match (failures.is_empty(), lenient) {
        (true, true) => bail!("{path}: expected at least one malformed rule"),
        (false, false) => bail!("{path}: {}", failures.join("; ")),
        _ => Ok(checked),
    }
}

fn check_fixtures() -> anyhow::Result<()> {
    let root = fixtures_dir();
    let mut errors = Vec::new();
    for entry in fs::read_dir(&root).with_context(|| format!("read {root}"))? {
        let entry = entry?;
        let Ok(dir) = Utf8PathBuf::from_path_buf(entry.path()) else {
            continue;
        };
        if !dir.join("inventory.json").is_file() {
            continue;
        }
        match check_fixture(&dir) {
            Ok(n) => println!("ok   {dir} ({n} rules)"),
            Err(e) => errors.push(format!("{e:#}")),
        }
    }

    if errors.is_empty() {
        return Ok(());
    }
    for e in &errors {
        eprintln!("FAIL {e}");
    }
    bail!("{} fixture(s) failed", errors.len())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  check-fixtures    Parse every rule of every tests/fixtures snapshot");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "check-fixtures" => check_fixtures(),
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
