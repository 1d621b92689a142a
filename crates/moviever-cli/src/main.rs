//! moviever - hidden-gem movie browsing CLI.

/// Application configuration (TOML).
mod config;
/// Session state and the tiered data path.
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{AppConfig, resolve_config_path, resolve_data_dir, resolve_snapshot_path};
use crate::session::Session;
use moviever_api::tmdb::{DiscoverQuery, TmdbClient};
use moviever_data::filter::{FilterSpec, filter};
use moviever_data::top_gems::{previous_month_gems, top_gems};
use moviever_data::types::PreparedMovie;
use moviever_data::export;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build the movie dataset (snapshot-first, remote on miss).
    Fetch(FetchArgs),
    /// Drop every cache tier and re-collect from the remote.
    Refresh(FetchArgs),
    /// Show the top hidden gems.
    Top(TopArgs),
    /// Browse the dataset with filters.
    List(ListArgs),
    /// Export a filtered subset to a timestamped CSV.
    Export(ExportArgs),
}

/// Arguments for the `fetch` and `refresh` subcommands.
#[derive(clap::Args)]
struct FetchArgs {
    /// Max discover pages to collect (default from config).
    #[arg(long)]
    pages: Option<u32>,
}

/// Arguments for the `top` subcommand.
#[derive(clap::Args)]
struct TopArgs {
    /// How many gems to show (default from config).
    #[arg(long)]
    count: Option<usize>,

    /// Rank only titles released in the previous calendar month.
    #[arg(long)]
    previous_month: bool,

    /// Minimum rating (default from config).
    #[arg(long)]
    min_rating: Option<f64>,

    /// Popularity ceiling (default from config).
    #[arg(long)]
    max_popularity: Option<f64>,

    /// Minimum vote count (default from config).
    #[arg(long)]
    min_votes: Option<u64>,
}

/// Filter flags shared by `list` and `export`.
#[derive(clap::Args)]
struct FilterArgs {
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,

    /// Popularity ceiling.
    #[arg(long)]
    max_popularity: Option<f64>,

    /// Minimum vote count.
    #[arg(long)]
    min_votes: Option<u64>,

    /// Earliest release year (inclusive).
    #[arg(long)]
    min_year: Option<i32>,

    /// Latest release year (inclusive).
    #[arg(long)]
    max_year: Option<i32>,

    /// Required genre name (e.g. "Comedy").
    #[arg(long)]
    genre: Option<String>,

    /// Required language (e.g. "Japanese").
    #[arg(long)]
    language: Option<String>,

    /// Include adult titles (excluded by default).
    #[arg(long)]
    include_adult: bool,

    /// Include titles without a release date (excluded by default).
    #[arg(long)]
    include_missing_dates: bool,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            min_rating: self.min_rating,
            max_popularity: self.max_popularity,
            min_vote_count: self.min_votes,
            min_year: self.min_year,
            max_year: self.max_year,
            genre: self.genre.clone(),
            language: self.language.clone(),
            include_adult: self.include_adult,
            include_missing_dates: self.include_missing_dates,
        }
    }
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Filter flags.
    #[command(flatten)]
    filter: FilterArgs,

    /// Max rows to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

/// Arguments for the `export` subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Filter flags.
    #[command(flatten)]
    filter: FilterArgs,

    /// Output directory (default: the data directory).
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client() -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Loaded config plus the resolved session for one command run.
struct Runtime {
    config: AppConfig,
    data_dir: PathBuf,
    session: Session,
}

/// Resolves config, data dir, and session state for a command.
fn build_runtime(dir: Option<&PathBuf>) -> Result<Runtime> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let data_dir = resolve_data_dir(dir).context("failed to resolve data directory")?;
    let session = Session::new(resolve_snapshot_path(&data_dir));
    Ok(Runtime {
        config,
        data_dir,
        session,
    })
}

/// Fills the session's dataset and returns an owned copy of the rows.
///
/// # Errors
///
/// Returns an error when no tier could produce the dataset.
async fn load_dataset(
    runtime: &mut Runtime,
    pages: Option<u32>,
) -> Result<Vec<PreparedMovie>> {
    let client = build_tmdb_client()?;
    let query = DiscoverQuery::new().language(&runtime.config.collection.language);
    let max_pages = pages.unwrap_or(runtime.config.collection.max_pages);

    // Ctrl-C breaks out of a rate-limit retry stall instead of killing
    // the process mid-write.
    let cancel = runtime.session.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling collection");
            cancel.cancel();
        }
    });

    let rows = runtime
        .session
        .get_data(
            &client,
            &query,
            max_pages,
            &runtime.config.collection.language,
        )
        .await;
    match rows {
        Some(rows) => Ok(rows.to_vec()),
        None => bail!("failed to build the movie dataset"),
    }
}

/// Prints one row per movie in a fixed-width listing.
fn print_rows(rows: &[PreparedMovie]) {
    tracing::info!("ID\tYear\tScore\tRating\tVotes\tTitle [Genres]");
    for row in rows {
        tracing::info!(
            "{}\t{}\t{:.2}\t{:.1}\t{}\t{} [{}]",
            row.id,
            row.year.map_or_else(|| String::from("-"), |y| y.to_string()),
            row.gems_score,
            row.vote_average,
            row.vote_count,
            row.title,
            row.genres_str,
        );
    }
}

/// Runs the `fetch` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or no tier produces data.
#[instrument(skip_all)]
async fn run_fetch(args: &FetchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut runtime = build_runtime(dir)?;
    let rows = load_dataset(&mut runtime, args.pages).await?;
    tracing::info!("Dataset ready: {} movies", rows.len());
    Ok(())
}

/// Runs the `refresh` subcommand.
///
/// # Errors
///
/// Returns an error if cache invalidation fails or re-collection fails.
#[instrument(skip_all)]
async fn run_refresh(args: &FetchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut runtime = build_runtime(dir)?;
    runtime
        .session
        .refresh()
        .context("failed to invalidate caches")?;
    tracing::info!("Caches cleared, re-collecting...");
    let rows = load_dataset(&mut runtime, args.pages).await?;
    tracing::info!("Dataset rebuilt: {} movies", rows.len());
    Ok(())
}

/// Runs the `top` subcommand.
///
/// # Errors
///
/// Returns an error if the dataset cannot be produced.
#[instrument(skip_all)]
async fn run_top(args: &TopArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut runtime = build_runtime(dir)?;
    let rows = load_dataset(&mut runtime, None).await?;

    let defaults = &runtime.config.defaults;
    let spec = FilterSpec {
        min_rating: Some(args.min_rating.unwrap_or(defaults.min_rating)),
        max_popularity: Some(args.max_popularity.unwrap_or(defaults.max_popularity)),
        min_vote_count: Some(args.min_votes.unwrap_or(defaults.min_vote_count)),
        ..FilterSpec::default()
    };
    let eligible = filter(&rows, &spec);
    let count = args.count.unwrap_or(defaults.top_n);

    let ranked = if args.previous_month {
        let today = Local::now().date_naive();
        previous_month_gems(&eligible, today, count)
    } else {
        top_gems(&eligible, count)
    };

    if ranked.is_empty() {
        tracing::info!("No movies matched the gem thresholds.");
        return Ok(());
    }
    print_rows(&ranked);
    tracing::info!("Total: {} gems", ranked.len());
    Ok(())
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the dataset cannot be produced.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut runtime = build_runtime(dir)?;
    let rows = load_dataset(&mut runtime, None).await?;

    let mut matched = filter(&rows, &args.filter.to_spec());
    let total = matched.len();
    matched.truncate(args.limit);

    print_rows(&matched);
    tracing::info!("Showing {} of {} matching movies", matched.len(), total);
    Ok(())
}

/// Runs the `export` subcommand.
///
/// # Errors
///
/// Returns an error if the dataset cannot be produced or the CSV write fails.
#[instrument(skip_all)]
async fn run_export(args: &ExportArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut runtime = build_runtime(dir)?;
    let rows = load_dataset(&mut runtime, None).await?;

    let matched = filter(&rows, &args.filter.to_spec());
    let out_dir = args.out.clone().unwrap_or(runtime.data_dir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create directory {}", out_dir.display()))?;
    let path = export::export_csv(&out_dir, &matched).context("failed to export CSV")?;

    tracing::info!("Exported {} movies to {}", matched.len(), path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => run_fetch(&args, cli.dir.as_ref()).await,
        Commands::Refresh(args) => run_refresh(&args, cli.dir.as_ref()).await,
        Commands::Top(args) => run_top(&args, cli.dir.as_ref()).await,
        Commands::List(args) => run_list(&args, cli.dir.as_ref()).await,
        Commands::Export(args) => run_export(&args, cli.dir.as_ref()).await,
    }
}
