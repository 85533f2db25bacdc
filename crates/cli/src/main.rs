//! Limo scenario replay binary.
//!
//! Usage:
//!   limo-sim --scenario game.toml
//!   limo-sim --scenario game.toml --config limo.toml
//!   limo-sim --scenario game.toml --seed 7
//!
//! Orders are written to stdout as JSON lines; logs go to stderr.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - log filter (default: info,limo_coordinator=debug)

use limo_cli::Scenario;
use limo_coordinator::CoordinatorConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,limo_coordinator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut scenario_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scenario" | "-s" => {
                if i + 1 < args.len() {
                    scenario_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--seed" => {
                if i + 1 < args.len() {
                    seed = Some(
                        args[i + 1]
                            .parse()
                            .map_err(|e| anyhow::anyhow!("Invalid seed '{}': {}", args[i + 1], e))?,
                    );
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Limo scenario replay");
                println!();
                println!("Usage: limo-sim --scenario <FILE> [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --scenario <FILE>    Scenario TOML to replay (required)");
                println!("  -c, --config <FILE>      Path to controller config TOML");
                println!("      --seed <N>           Tie-break seed (overrides the config)");
                println!("  -h, --help               Show this help message");
                println!();
                println!("Environment variables:");
                println!(
                    "  RUST_LOG                 Log filter (default: info,limo_coordinator=debug)"
                );
                return Ok(());
            }
            other => {
                tracing::warn!(arg = other, "Ignoring unknown argument");
            }
        }
        i += 1;
    }

    let Some(scenario_path) = scenario_path else {
        anyhow::bail!("Missing --scenario <FILE> (see --help)");
    };

    let mut config = if let Some(path) = config_path {
        tracing::info!(path = %path, "Loading configuration");
        CoordinatorConfig::from_file(&path)?
    } else {
        tracing::info!("Using default configuration");
        CoordinatorConfig::default()
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    tracing::info!(path = %scenario_path, "Loading scenario");
    let scenario = Scenario::from_file(&scenario_path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    scenario.replay(config, &mut out)?;

    Ok(())
}
