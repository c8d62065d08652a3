use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cli::commands;
use std::io;
use std::path::PathBuf;
use storage::WatchStatus;
use tracing_subscriber::EnvFilter;
use tracker_core::bootstrap;
use tracker_core::config;
use tracker_core::entry::EntryForm;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        cfg.store.path = store;
    }
    commands::check_gate(&cfg.auth.password, cli.password.as_deref())?;

    let tracker = bootstrap::build_tracker(&cfg)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Search { title, json } => {
            commands::run_search(&tracker, &title, json, &mut out).await
        }
        Commands::Add {
            title,
            scores,
            status,
            streaming,
            genre,
            notes,
            favorite,
            watched,
            pick,
            json,
        } => {
            let form = EntryForm {
                scores,
                status,
                streaming,
                genre,
                date_watched: watched,
                favorite_character: favorite.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
                ..Default::default()
            };
            commands::run_add(&tracker, &title, &form, pick, json, &mut out).await
        }
        Commands::List { json, limit } => commands::run_list(&tracker, json, limit, &mut out),
        Commands::Import { file } => commands::run_import(&tracker, &file, &mut out),
        Commands::Export { output } => {
            commands::run_export(&tracker, output.as_deref(), &mut out)
        }
    }
}

#[derive(Parser)]
#[command(name = "show-tracker")]
#[command(about = "Track TV shows with fetched metadata and personal scores", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Override the dataset CSV path
    #[arg(long)]
    store: Option<String>,

    /// Shared password, required when auth.password is configured
    #[arg(long, env = "TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a show and print its attributes
    Search {
        title: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up a show, merge your scores and append it to the dataset
    Add {
        title: String,
        /// Seven sub-scores (0-10): story,acting,characters,visuals,pacing,soundtrack,rewatchability
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        scores: Vec<f64>,
        /// Completed | In Progress | Ongoing | Not Started
        #[arg(long, default_value = "Not Started")]
        status: WatchStatus,
        /// Streaming platform
        #[arg(long)]
        streaming: Option<String>,
        /// Replace the fetched genre
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Favorite character
        #[arg(long)]
        favorite: Option<String>,
        /// Date watched (YYYY-MM-DD)
        #[arg(long)]
        watched: Option<NaiveDate>,
        /// Candidate number to use when the provider runs in select mode
        #[arg(long)]
        pick: Option<usize>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the dataset, best average first
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Only show the top N rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Replace the dataset with an uploaded CSV
    Import { file: PathBuf },
    /// Write the dataset as CSV to a file or stdout
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
