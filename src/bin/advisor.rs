//! Command-line front end for the recommendation engine.
//!
//! Loads a catalog and a profile from JSON files, runs the pipeline, and
//! prints the result as JSON. Backend selection and credentials come from
//! the environment (see the config module); a misconfigured backend fails
//! here at startup, before any profile is read.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use career_advisor::{CatalogStore, RecommendationEngine, UserProfile};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON file containing an array of career options
    #[arg(short, long, env = "ADVISOR_CATALOG")]
    catalog: PathBuf,

    /// Path to a JSON file containing the user profile
    #[arg(short, long, env = "ADVISOR_PROFILE")]
    profile: PathBuf,

    /// Overall pipeline deadline in seconds; on expiry the deterministic
    /// fallback answers instead
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Pretty-print the result JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let engine = RecommendationEngine::from_env().context("backend configuration")?;

    let catalog = CatalogStore::from_json_file(&cli.catalog).context("loading catalog")?;

    let profile_raw = std::fs::read_to_string(&cli.profile)
        .with_context(|| format!("reading profile {}", cli.profile.display()))?;
    let profile: UserProfile =
        serde_json::from_str(&profile_raw).context("parsing profile JSON")?;

    let report = engine.validate_profile(&profile);
    if !report.ok {
        for error in &report.errors {
            eprintln!("profile error: {}", error);
        }
        std::process::exit(2);
    }

    let result = match cli.timeout_secs {
        Some(secs) => {
            engine
                .get_recommendations_with_timeout(
                    &profile,
                    catalog.options(),
                    Duration::from_secs(secs),
                )
                .await
        }
        None => engine.get_recommendations(&profile, catalog.options()).await,
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    Ok(())
}
