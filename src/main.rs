mod db;
mod error;
mod fetch;
mod parser;
mod pipeline;
mod settings;
mod table;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::fetch::Fetcher;
use crate::parser::ContactRecord;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "contact_scraper", about = "Scrape a directory page into a local contact store")]
struct Cli {
    /// Config file (default: ./contact_scraper.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite file holding the contacts table
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the contact store if it does not exist
    Init,
    /// Fetch a page, extract contacts, store new ones and print them
    Scrape {
        /// Page to fetch (falls back to `url` in the config)
        url: Option<String>,
        /// Ruleset id (see `rulesets`)
        #[arg(short, long)]
        ruleset: Option<String>,
        /// Request timeout in seconds, 0 for none
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print every stored contact
    List {
        /// Header label for the secondary column
        #[arg(short, long)]
        ruleset: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List available rulesets
    Rulesets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }

    let result = match cli.command {
        Commands::Init => {
            let n = pipeline::init_store(&settings.db_path)
                .with_context(|| format!("Failed to open {:?}", settings.db_path))?;
            println!("Contact store ready at {:?} ({} contacts)", settings.db_path, n);
            Ok(())
        }
        Commands::Scrape {
            url,
            ruleset,
            timeout,
            json,
        } => {
            if let Some(t) = timeout {
                settings.timeout_secs = t;
            }
            let ruleset = settings.resolve_ruleset(ruleset.as_deref().unwrap_or(&settings.ruleset))?;
            let url = url.or_else(|| settings.url.clone()).unwrap_or_default();
            let fetcher = Fetcher::new(settings.timeout())?;

            let spinner = spinner(&url);
            let outcome = pipeline::scrape(&url, &ruleset, &fetcher, &settings.db_path).await;
            spinner.finish_and_clear();

            match outcome {
                Ok(records) if records.is_empty() => {
                    println!("No contacts found.");
                    Ok(())
                }
                Ok(records) => print_records(&records, &settings, &ruleset.secondary_label, json),
                Err(e) => Err(anyhow::Error::new(e).context("Scrape failed")),
            }
        }
        Commands::List { ruleset, json } => {
            let label = settings
                .resolve_ruleset(ruleset.as_deref().unwrap_or(&settings.ruleset))?
                .secondary_label;
            let records = pipeline::stored_contacts(&settings.db_path)
                .with_context(|| format!("Failed to read {:?}", settings.db_path))?;
            if records.is_empty() && !json {
                println!("No contacts stored yet.");
                return Ok(());
            }
            print_records(&records, &settings, &label, json)
        }
        Commands::Rulesets => {
            for (id, label) in settings.ruleset_labels() {
                let marker = if id == settings.ruleset.to_lowercase() { "*" } else { " " };
                println!("{} {:<16} {}", marker, id, label);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn spinner(url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching {}", url.trim()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_records(
    records: &[ContactRecord],
    settings: &Settings,
    secondary_label: &str,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        print!("{}", table::format_table(records, &settings.columns, secondary_label));
        println!("\n{} contacts", records.len());
    }
    Ok(())
}
