//! Career-match CLI and HTTP server entrypoint.
//!
//! # Usage
//!
//! ```bash
//! # Load data
//! career-match ingest --jobs data/jobs.csv --resumes data/resumes.csv
//!
//! # Query
//! career-match match-jobs "Senior Python developer, 6 years of AWS" -n 5
//! career-match match-jobs --resume-file cv.txt --min-score 0.4 --json
//! career-match match-resumes --title "Data Scientist" --description "ML, Python" --category INFORMATION-TECHNOLOGY
//! career-match categories
//! career-match stats
//!
//! # Serve the HTTP API
//! career-match serve
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use career_match::config::Config;
use career_match::constants::{DEFAULT_MIN_SCORE, DEFAULT_N_RESULTS, INGEST_BATCH_SIZE};
use career_match::embedding::{MiniLmEmbedder, TextEmbedder};
use career_match::gateway::{HandlerState, create_router_with_state};
use career_match::ingest::Ingestor;
use career_match::matcher::{CareerCoachMatcher, DbStats, MatchOptions, SearchResult};
use career_match::scoring::SimilarityTransform;
use career_match::vectordb::QdrantIndex;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Characters of document text shown per result in human output.
const PREVIEW_CHARS: usize = 200;

/// Semantic resume ⇄ job matching.
///
/// Settings come from `CAREER_*` environment variables; flags override them.
#[derive(Parser)]
#[command(name = "career-match", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Qdrant gRPC endpoint
    #[arg(long, global = true)]
    qdrant_url: Option<String>,

    /// Sentence-transformer model directory (stub embedder when unset)
    #[arg(long, global = true)]
    model_path: Option<PathBuf>,

    /// Distance → similarity mapping (one-minus-distance, half-cosine)
    #[arg(long, global = true)]
    transform: Option<SimilarityTransform>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Embed CSV files into the job and resume collections
    Ingest {
        /// CSV with `Job Title` and `Job Description` columns
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// CSV with `resume_id`, `category`, `file_path`, `resume_text` columns
        #[arg(long)]
        resumes: Option<PathBuf>,

        /// Records embedded and written per round-trip
        #[arg(long, default_value_t = INGEST_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Best-matching jobs for a resume
    MatchJobs {
        /// Resume text
        #[arg(required_unless_present = "resume_file")]
        resume_text: Option<String>,

        /// Read the resume text from a file instead
        #[arg(long, conflicts_with = "resume_text")]
        resume_file: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Best-matching resumes for a job
    MatchResumes {
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Only consider resumes in this category
        #[arg(long)]
        category: Option<String>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// List resume categories
    Categories,

    /// Collection sizes and category breakdown
    Stats,

    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        bind_addr: Option<std::net::IpAddr>,
    },
}

#[derive(clap::Args)]
struct OptionArgs {
    /// Maximum number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_N_RESULTS)]
    n_results: usize,

    /// Drop results scoring below this (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: f32,
}

impl From<&OptionArgs> for MatchOptions {
    fn from(args: &OptionArgs) -> Self {
        MatchOptions::new(args.n_results, args.min_score)
    }
}

type Matcher = CareerCoachMatcher<MiniLmEmbedder, QdrantIndex>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.qdrant_url.clone() {
        config.qdrant_url = url;
    }
    if let Some(path) = cli.model_path.clone() {
        config.model_path = Some(path);
    }
    if let Some(transform) = cli.transform {
        config.similarity_transform = transform;
    }
    if let Command::Serve { port, bind_addr } = &cli.command {
        if let Some(port) = port {
            config.port = *port;
        }
        if let Some(addr) = bind_addr {
            config.bind_addr = *addr;
        }
    }
    config.validate()?;

    let (embedder, index) = build_components(&config)?;
    let matcher = CareerCoachMatcher::new(
        Arc::clone(&embedder),
        Arc::clone(&index),
        config.matcher_config(),
    );

    match &cli.command {
        Command::Ingest {
            jobs,
            resumes,
            batch_size,
        } => {
            let ingestor = Ingestor::new(embedder, index).with_batch_size(*batch_size);
            run_ingest(&ingestor, &matcher, jobs.as_ref(), resumes.as_ref(), cli.json).await
        }
        Command::MatchJobs {
            resume_text,
            resume_file,
            options,
        } => {
            let text = match (resume_text, resume_file) {
                (_, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (Some(text), None) => text.clone(),
                (None, None) => bail!("provide resume text or --resume-file"),
            };
            let results = matcher.find_jobs_for_resume(&text, options.into()).await?;
            print_results("Jobs", &results, cli.json)
        }
        Command::MatchResumes {
            title,
            description,
            category,
            options,
        } => {
            let results = matcher
                .find_resumes_for_job(title, description, category.as_deref(), options.into())
                .await?;
            print_results("Resumes", &results, cli.json)
        }
        Command::Categories => {
            let categories = matcher.get_all_categories().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                println!("{} categories", categories.len());
                for category in &categories {
                    println!("  {category}");
                }
            }
            Ok(())
        }
        Command::Stats => {
            let stats = matcher.get_db_stats().await?;
            print_stats(&stats, cli.json)
        }
        Command::Serve { .. } => serve(matcher, &config).await,
    }
}

fn build_components(config: &Config) -> Result<(Arc<MiniLmEmbedder>, Arc<QdrantIndex>)> {
    if config.model_path.is_none() {
        tracing::warn!("No CAREER_MODEL_PATH configured, running embedder in stub mode");
    }
    let embedder = MiniLmEmbedder::load(config.embedder_config())?;
    let index = QdrantIndex::new(&config.qdrant_url)?;

    tracing::info!(
        qdrant_url = %config.qdrant_url,
        model = embedder.model_id(),
        transform = %config.similarity_transform,
        "Matcher ready"
    );

    Ok((Arc::new(embedder), Arc::new(index)))
}

async fn run_ingest(
    ingestor: &Ingestor<MiniLmEmbedder, QdrantIndex>,
    matcher: &Matcher,
    jobs: Option<&PathBuf>,
    resumes: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    if jobs.is_none() && resumes.is_none() {
        bail!("nothing to ingest: pass --jobs and/or --resumes");
    }

    let collections = matcher.config();

    let mut reports = serde_json::Map::new();
    if let Some(path) = jobs {
        let report = ingestor
            .ingest_jobs_csv(path, &collections.jobs_collection)
            .await?;
        reports.insert("jobs".to_string(), serde_json::to_value(report)?);
        if !json {
            println!(
                "Jobs: {} ingested, {} skipped, {} duplicate ids ({} batches) from {}",
                report.ingested,
                report.skipped,
                report.duplicates,
                report.batches,
                path.display()
            );
        }
    }
    if let Some(path) = resumes {
        let report = ingestor
            .ingest_resumes_csv(path, &collections.resumes_collection)
            .await?;
        reports.insert("resumes".to_string(), serde_json::to_value(report)?);
        if !json {
            println!(
                "Resumes: {} ingested, {} skipped, {} duplicate ids ({} batches) from {}",
                report.ingested,
                report.skipped,
                report.duplicates,
                report.batches,
                path.display()
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn print_results(label: &str, results: &[SearchResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matching {} found.", label.to_lowercase());
        return Ok(());
    }

    println!("{label} ({} results)", results.len());
    for (rank, result) in results.iter().enumerate() {
        println!(
            "\n{}. {} [{}]  similarity {:.1}%",
            rank + 1,
            result.title(),
            result.id,
            result.similarity_score * 100.0
        );
        if let Some(category) = result.metadata.get("category") {
            println!("   category: {category}");
        }
        let preview = result.preview(PREVIEW_CHARS);
        let ellipsis = if preview.len() < result.text.len() { "..." } else { "" };
        println!("   {}{}", preview.replace('\n', " "), ellipsis);
    }
    Ok(())
}

fn print_stats(stats: &DbStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("Resumes: {}", stats.total_resumes);
    println!("Jobs:    {}", stats.total_jobs);
    println!(
        "Model:   {} ({} dims)",
        stats.embedding_model, stats.embedding_dimension
    );
    if !stats.resume_categories.is_empty() {
        println!("\nResumes by category:");
        for (category, count) in &stats.resume_categories {
            println!("  {category:<32} {count}");
        }
    }
    Ok(())
}

async fn serve(matcher: Matcher, config: &Config) -> Result<()> {
    let addr = config.socket_addr();

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "career-match server starting"
    );

    let app = create_router_with_state(HandlerState::new(matcher));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("career-match shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
