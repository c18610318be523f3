mod craft;
mod error;
mod price;
mod report;
mod settings;
mod stash;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use craft::Variant;
use report::RenderMode;
use settings::Settings;
use stash::StashSource;

#[derive(Parser)]
#[command(name = "hortiscan", about = "Horticrafting station scanner and price list generator")]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, env = "HSC_CONFIG", default_value = "config.json", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read stash tabs, classify every craft and print the report
    Report {
        /// Dump every craft grouped by category instead of the priced summary
        #[arg(long, env = "FULL_OUTPUT", value_parser = FalseyValueParser::new())]
        full: bool,
        /// Read only this stash tab (overrides the settings file)
        #[arg(short, long)]
        tab: Option<usize>,
        /// Read crafts from a file (stash JSON or one craft per line) instead of the API
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Variant::Phrase)]
        variant: Variant,
        /// Abort on the first malformed craft instead of skipping it
        #[arg(long)]
        strict: bool,
        /// Session cookie (overrides the settings file)
        #[arg(long, env = "POESESSID", hide_env_values = true)]
        poesessid: Option<String>,
    },
    /// Classify the given craft texts and print one row per craft
    Classify {
        #[arg(required = true)]
        texts: Vec<String>,
        #[arg(long, value_enum, default_value_t = Variant::Phrase)]
        variant: Variant,
        /// Print JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;

    let result = match cli.command {
        Commands::Report {
            full,
            tab,
            input,
            variant,
            strict,
            poesessid,
        } => {
            let crafts = match input {
                Some(path) => stash::read_crafts_file(&path)?,
                None => {
                    let source = stash_source(&settings, poesessid)?;
                    stash::fetch_crafts(source, tab.or(settings.tab)).await?
                }
            };

            let classified = craft::classify_all(&crafts, variant, &settings.price, strict)?;
            if !classified.skipped.is_empty() {
                warn!("Skipped {} malformed crafts", classified.skipped.len());
            }
            info!("Classified {} crafts", classified.records.len());

            let groups = report::group::aggregate(classified.records);
            let header = settings.header_line();
            let lines = report::render(
                &groups,
                RenderMode::from_full_flag(full),
                &settings.report_options(header.as_deref()),
            );
            report::write_lines(std::io::stdout().lock(), &lines)?;
            Ok(())
        }
        Commands::Classify {
            texts,
            variant,
            json,
        } => {
            if !json {
                println!(
                    "{:<16} | {:<28} | {:>5} | {:<5} | {}",
                    "Category", "Subcategory", "Level", "Lucky", "Price"
                );
                println!("{}", "-".repeat(72));
            }
            for text in &texts {
                let r = craft::classify(text, variant, &settings.price)?;
                if json {
                    println!("{}", serde_json::to_string(&r)?);
                } else {
                    println!(
                        "{:<16} | {:<28} | {:>5} | {:<5} | {}",
                        r.category,
                        truncate(&r.subcategory, 28),
                        r.level,
                        if r.lucky { "yes" } else { "" },
                        r.price
                    );
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }

    result
}

/// Settings file, or defaults when it does not exist.
fn load_settings(path: &Path) -> Result<Settings> {
    if path.exists() {
        Settings::load(path)
    } else {
        warn!("Settings file {} not found, using defaults", path.display());
        Ok(Settings::default())
    }
}

fn stash_source(settings: &Settings, poesessid: Option<String>) -> Result<StashSource> {
    let account_name = settings
        .account_name
        .clone()
        .ok_or_else(|| anyhow!("accountName must be set in the settings file (or use --input)"))?;
    let poesessid = poesessid
        .or_else(|| settings.poesessid.clone())
        .ok_or_else(|| anyhow!("POESESSID must be set in the settings file or environment"))?;
    Ok(StashSource {
        account_name,
        poesessid,
        league: settings.league().to_string(),
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
