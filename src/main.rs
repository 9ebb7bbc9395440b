use anyhow::Context;
use clap::{Parser, Subcommand};
use networth_api::{format_estimate, format_similarity, AppState, RestApi};
use networth_core::{
    EmbeddingProvider, NetWorthPipeline, RankerConfig, ShingleEmbedder, DEFAULT_EMBEDDING_DIM,
    DEFAULT_TOP_K,
};
use networth_storage::{
    default_subjects, load_or_generate, load_subjects, sample_check, DatasetConfig,
    DatasetGenerator, ProfileStoreLoader, DEFAULT_DATASET_PATH,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Estimate net worth potential from a photo
#[derive(Parser, Debug)]
#[command(name = "networth")]
#[command(about = "Match a photo against celebrity profiles and estimate net worth", long_about = None)]
struct Args {
    /// Path to the generated profile dataset
    #[arg(short, long, global = true, default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Minimum similarity for a match (inclusive); no filtering when unset
    #[arg(long, global = true, allow_negative_numbers = true)]
    threshold: Option<f32>,

    /// Maximum number of matches to average
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Embedding dimension produced by the built-in embedder
    #[arg(long, global = true, default_value_t = DEFAULT_EMBEDDING_DIM)]
    embedding_dim: usize,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API, generating the dataset first if it is missing
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,
    },
    /// Estimate net worth for a single image file
    Estimate {
        /// Image to match
        image: PathBuf,
    },
    /// Embed subject images and write the profile dataset
    Generate {
        /// JSON manifest of subjects; the built-in list is used when omitted
        #[arg(long)]
        subjects: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ranker_config = RankerConfig {
        threshold: args.threshold,
        top_k: args.top_k,
    };
    let loader = ProfileStoreLoader::new(DatasetConfig::new(&args.dataset));
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(ShingleEmbedder::new(args.embedding_dim)?);

    match args.command {
        Command::Serve { http_port } => serve(loader, provider, ranker_config, http_port).await,
        Command::Estimate { image } => estimate_file(&loader, provider, ranker_config, &image),
        Command::Generate { subjects } => generate(&args.dataset, provider, subjects),
    }
}

async fn serve(
    loader: ProfileStoreLoader,
    provider: Arc<dyn EmbeddingProvider>,
    config: RankerConfig,
    http_port: u16,
) -> anyhow::Result<()> {
    info!("Starting networth v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", loader.path());
    info!("Ranking: threshold={:?} top_k={}", config.threshold, config.top_k);

    let generator = DatasetGenerator::new(provider.clone());
    let store = load_or_generate(&loader, &generator, &default_subjects())?;

    let pipeline = NetWorthPipeline::new(provider.clone(), config)?;
    match sample_check(&pipeline, &store) {
        Ok(Some(check)) => info!(
            "Sample estimate: {} ({} matches)",
            format_estimate(check.estimate),
            check.matches
        ),
        Ok(None) => {}
        Err(e) => warn!("Sample check failed: {}", e),
    }

    let state = Arc::new(AppState::new(store, loader, provider, config)?);

    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn estimate_file(
    loader: &ProfileStoreLoader,
    provider: Arc<dyn EmbeddingProvider>,
    config: RankerConfig,
    image: &Path,
) -> anyhow::Result<()> {
    let store = loader.load()?;
    let bytes = std::fs::read(image).with_context(|| format!("reading image {:?}", image))?;

    let pipeline = NetWorthPipeline::new(provider, config)?;
    let result = pipeline.estimate_image(&bytes, &store)?;

    println!("Estimated net worth: {}", format_estimate(result.estimate));
    if result.has_matches() {
        for m in &result.matches {
            println!(
                "Match: {}, Similarity: {} ({:.4})",
                m.profile.name,
                format_similarity(m.score),
                m.score
            );
        }
    } else {
        println!("No close matches found.");
    }
    Ok(())
}

fn generate(
    output: &Path,
    provider: Arc<dyn EmbeddingProvider>,
    subjects: Option<PathBuf>,
) -> anyhow::Result<()> {
    let subjects = match subjects {
        Some(path) => load_subjects(&path)?,
        None => default_subjects(),
    };

    let report = DatasetGenerator::new(provider).generate(&subjects, output)?;
    println!(
        "Processed {} subjects: {} succeeded, {} failed",
        report.total, report.succeeded, report.failed
    );
    Ok(())
}
