//! CLI entry point for netreach.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `netreach-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use netreach_app::{
    EgressParams, IngressParams, LoadInput, RuleFilter, RuleView, SnapshotAnalysis,
    decision_exit_code, format_decision, format_rules, load_analysis,
};
use netreach_settings::Overrides;
use netreach_types::{AddressRange, Direction, Protocol};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "netreach",
    version,
    about = "Static reachability checks over layered cloud firewall policies"
)]
struct Cli {
    /// Inventory snapshot (JSON) to analyse.
    #[arg(long, default_value = "inventory.json")]
    inventory: Utf8PathBuf,

    /// Path to netreach config TOML. A missing file means defaults.
    #[arg(long, default_value = "netreach.toml")]
    config: Utf8PathBuf,

    /// Override profile (default|strict).
    #[arg(long)]
    profile: Option<String>,

    /// Override the equal-priority ordering (numeric|hierarchy_first).
    #[arg(long)]
    tie_break: Option<String>,

    /// Override malformed rule handling (drop|reject).
    #[arg(long)]
    malformed_rules: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// Project that owns the network.
    #[arg(long)]
    project: String,

    /// VPC network name.
    #[arg(long, default_value = "default")]
    network: String,

    /// Traffic direction (ingress|egress).
    #[arg(long)]
    direction: Direction,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide whether a flow is allowed and explain which rule decided it.
    Check {
        #[command(flatten)]
        target: NetworkArgs,

        /// IP protocol name or number.
        #[arg(long, default_value = "all")]
        protocol: Protocol,

        #[arg(long)]
        port: Option<u16>,

        /// Peer address or CIDR: the source for ingress, the destination for egress.
        #[arg(long)]
        range: Option<AddressRange>,

        /// Network tag of the sending VM (ingress only, repeatable).
        #[arg(long = "source-tag")]
        source_tags: Vec<String>,

        /// Network tag of the VM in this network (repeatable).
        #[arg(long = "target-tag")]
        target_tags: Vec<String>,

        /// Service account of the sending VM (ingress only).
        #[arg(long)]
        source_service_account: Option<String>,

        /// Service account of the VM in this network.
        #[arg(long)]
        target_service_account: Option<String>,

        /// Print the decision as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the network's VPC firewall rules, by priority then name.
    Rules {
        #[command(flatten)]
        target: NetworkArgs,

        /// Exact rule name.
        #[arg(long)]
        name: Option<String>,

        /// Glob over rule names, e.g. 'allow-*'.
        #[arg(long)]
        name_pattern: Option<String>,

        /// Keep rules targeting any of these tags (repeatable).
        #[arg(long = "target-tag")]
        target_tags: Vec<String>,

        /// Print the rules as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let result = (|| -> anyhow::Result<i32> {
        let analysis = open_analysis(&cli)?;
        match &cli.cmd {
            Commands::Check {
                target,
                protocol,
                port,
                range,
                source_tags,
                target_tags,
                source_service_account,
                target_service_account,
                json,
            } => {
                let network = analysis
                    .get_network(&target.project, &target.network)
                    .context("get network")?;
                let decision = match target.direction {
                    Direction::Ingress => {
                        let mut params = IngressParams::new(*protocol);
                        params.port = *port;
                        params.source_range = *range;
                        params.source_tags = source_tags.clone();
                        params.source_service_account = source_service_account.clone();
                        params.target_tags = target_tags.clone();
                        params.target_service_account = target_service_account.clone();
                        network.firewall.check_connectivity_ingress(&params)
                    }
                    Direction::Egress => {
                        if !source_tags.is_empty() || source_service_account.is_some() {
                            anyhow::bail!(
                                "--source-tag and --source-service-account only apply to ingress"
                            );
                        }
                        let mut params = EgressParams::new(*protocol);
                        params.port = *port;
                        params.destination_range = *range;
                        params.target_tags = target_tags.clone();
                        params.target_service_account = target_service_account.clone();
                        network.firewall.check_connectivity_egress(&params)
                    }
                };

                if *json {
                    let text =
                        serde_json::to_string_pretty(&decision).context("serialize decision")?;
                    println!("{text}");
                } else {
                    print!("{}", format_decision(&decision));
                }
                Ok(decision_exit_code(&decision))
            }
            Commands::Rules {
                target,
                name,
                name_pattern,
                target_tags,
                json,
            } => {
                let network = analysis
                    .get_network(&target.project, &target.network)
                    .context("get network")?;
                let filter = RuleFilter {
                    name_pattern: name_pattern.clone(),
                    name: name.clone(),
                    target_tags: target_tags.clone(),
                };
                let rules = match target.direction {
                    Direction::Ingress => network.firewall.get_vpc_ingress_rules(&filter),
                    Direction::Egress => network.firewall.get_vpc_egress_rules(&filter),
                }
                .context("list rules")?;

                if *json {
                    let views: Vec<RuleView> = rules.iter().map(RuleView::from).collect();
                    let text = serde_json::to_string_pretty(&views).context("serialize rules")?;
                    println!("{text}");
                } else {
                    print!("{}", format_rules(&rules));
                }
                Ok(0)
            }
        }
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("netreach error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open_analysis(cli: &Cli) -> anyhow::Result<SnapshotAnalysis> {
    // Missing config file is allowed (defaults apply).
    let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();
    let overrides = Overrides {
        profile: cli.profile.clone(),
        tie_break: cli.tie_break.clone(),
        malformed_rules: cli.malformed_rules.clone(),
    };
    let analysis = load_analysis(LoadInput {
        inventory_path: &cli.inventory,
        config_text: &cfg_text,
        overrides,
    })?;
    tracing::debug!(inventory = %cli.inventory, "analysis ready");
    Ok(analysis)
}
