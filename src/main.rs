use animatch::{
    rank_explained_async, Catalog, EmbeddingField, ErrorKind, ItemId, RankingConfig,
    RecommendationResponse, SortKey, UNKNOWN_TITLE,
};
use anyhow::{bail, Context};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend similar anime from precomputed embeddings
#[derive(Parser, Debug)]
#[command(name = "animatch")]
#[command(about = "Recommend similar anime from precomputed embeddings", long_about = None)]
struct Args {
    /// JSON array of merged anime documents
    #[arg(short, long, conflicts_with_all = ["features", "embeddings"])]
    catalog: Option<PathBuf>,

    /// JSON export of the features collection
    #[arg(long, requires = "embeddings")]
    features: Option<PathBuf>,

    /// JSON export of the embeddings collection
    #[arg(long, requires = "features")]
    embeddings: Option<PathBuf>,

    /// Selected anime id (repeat for several)
    #[arg(short, long = "select", required = true)]
    selected: Vec<ItemId>,

    /// Number of recommendations to return
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Ranking config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Weight override, e.g. `genres=0.5` (repeatable)
    #[arg(short, long = "weight", value_parser = parse_weight)]
    weights: Vec<(EmbeddingField, f32)>,

    /// Rescale weights to sum to 1.0
    #[arg(long)]
    normalize: bool,

    /// Catalog order used to break score ties
    #[arg(long, default_value = "popularity")]
    sort_by: SortKey,

    /// Print the full JSON response with per-field contributions
    #[arg(long)]
    explain: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_weight(s: &str) -> Result<(EmbeddingField, f32), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=WEIGHT, got '{}'", s))?;
    let field: EmbeddingField = field.parse().map_err(|e: animatch::Error| e.to_string())?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight '{}': {}", value, e))?;
    Ok((field, value))
}

fn load_config(args: &Args) -> anyhow::Result<RankingConfig> {
    let mut config = match &args.config {
        Some(path) => RankingConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => RankingConfig::default(),
    };

    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if args.normalize {
        config.normalize_weights = true;
    }
    if !args.weights.is_empty() {
        let overrides: BTreeMap<EmbeddingField, f32> = args.weights.iter().copied().collect();
        config.weights = config.weights.with_overrides(&overrides)?;
    }

    config.validate()?;
    Ok(config)
}

fn load_catalog(args: &Args) -> anyhow::Result<Catalog> {
    let catalog = match (&args.catalog, &args.features, &args.embeddings) {
        (Some(path), _, _) => Catalog::from_json_file(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        (None, Some(features), Some(embeddings)) => Catalog::from_json_files(features, embeddings)
            .context("failed to load features/embeddings exports")?,
        _ => bail!("provide --catalog, or both --features and --embeddings"),
    };

    let catalog = catalog.sorted(args.sort_by);
    catalog.validate_dimensions()?;
    Ok(catalog)
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
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;
    let catalog = Arc::new(load_catalog(&args)?);
    info!(items = catalog.len(), selected = ?args.selected, "catalog ready");
    debug!(?config, "ranking config");

    let ranker = config.ranker()?;
    let weights = ranker.weights().clone();

    let ranked = match rank_explained_async(
        ranker,
        args.selected.clone(),
        catalog.clone(),
        config.top_n,
    )
    .await
    {
        Ok(ranked) => ranked,
        Err(err) => match err.downcast_ref::<animatch::Error>() {
            Some(e) if e.kind() == ErrorKind::NotFound => {
                println!("No recommendations: none of the selected ids are in the catalog.");
                return Ok(());
            }
            _ => return Err(err),
        },
    };

    if args.explain {
        let candidates_count = catalog
            .items()
            .iter()
            .filter(|item| !args.selected.contains(&item.id))
            .count();
        let response =
            RecommendationResponse::from_ranked(&args.selected, &ranked, &weights, candidates_count);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    for (position, result) in ranked.iter().enumerate() {
        let title = catalog
            .metadata_for(result.id)
            .map(|meta| meta.title.as_str())
            .unwrap_or(UNKNOWN_TITLE);
        println!("{:>3}. {:>8}  {:.4}  {}", position + 1, result.id, result.score, title);
    }

    Ok(())
}
