//! cinematch — movie recommendations from a rating matrix.
//!
//! Loads the item attribute and user rating tables, then answers a single
//! query per invocation.

use anyhow::Context;
use cinematch_core::config::AppConfig;
use cinematch_core::types::{RecommendationRequest, RecommendationStrategy};
use cinematch_loader::TextFileSource;
use cinematch_recommender::{RatingStore, Recommender};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "cinematch")]
#[command(about = "Content-based and collaborative-filtering movie recommender")]
#[command(version)]
struct Cli {
    /// Config file (TOML, extension optional)
    #[arg(long, default_value = "cinematch")]
    config: String,

    /// Item attributes file (overrides config)
    #[arg(long, env = "CINEMATCH__DATA__ATTRIBUTES_PATH")]
    attributes: Option<String>,

    /// User ratings file (overrides config)
    #[arg(long, env = "CINEMATCH__DATA__RATINGS_PATH")]
    ratings: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Content,
    Cf,
}

impl From<StrategyArg> for RecommendationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Content => RecommendationStrategy::ContentBased,
            StrategyArg::Cf => RecommendationStrategy::CollaborativeFiltering,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recommend one movie by content similarity to the user's taste profile
    Content {
        /// User name
        user: String,
    },

    /// Predict the user's rating for a movie
    Predict {
        /// Movie name
        item: String,

        /// User name
        user: String,

        /// Neighbourhood size (overrides config)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Recommend one movie by item-based collaborative filtering
    Cf {
        /// User name
        user: String,

        /// Neighbourhood size (overrides config)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Print a ranked recommendation list as JSON
    Rank {
        /// User name
        user: String,

        #[arg(short, long, value_enum, default_value_t = StrategyArg::Content)]
        strategy: StrategyArg,

        /// Maximum number of movies (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Neighbourhood size for collaborative filtering (overrides config)
        #[arg(short, long)]
        k: Option<usize>,

        /// Comma-separated movies to leave out
        #[arg(short, long, value_delimiter = ',')]
        exclude: Vec<String>,
    },

    /// List known users with their number of ratings
    Users,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cinematch=info,cinematch_recommender=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = AppConfig::load_from(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(path) = cli.attributes {
        config.data.attributes_path = path;
    }
    if let Some(path) = cli.ratings {
        config.data.ratings_path = path;
    }

    info!(
        attributes = %config.data.attributes_path,
        ratings = %config.data.ratings_path,
        neighbors = config.recommender.neighbors,
        "Configuration loaded"
    );

    let source = TextFileSource::new(&config.data.attributes_path, &config.data.ratings_path);
    let store = RatingStore::load(&source).context("failed to load rating data")?;
    let default_k = config.recommender.neighbors;
    let default_limit = config.recommender.limit;
    let recommender = Recommender::with_config(store, config.recommender);

    match cli.command {
        Commands::Content { user } => {
            println!("{}", recommender.recommend_by_content(&user));
        }
        Commands::Predict { item, user, k } => {
            let score = recommender.predict_score(&item, &user, k.unwrap_or(default_k));
            println!("{score}");
        }
        Commands::Cf { user, k } => {
            let pick =
                recommender.recommend_by_collaborative_filtering(&user, k.unwrap_or(default_k));
            println!("{pick}");
        }
        Commands::Rank {
            user,
            strategy,
            limit,
            k,
            exclude,
        } => {
            let mut request =
                RecommendationRequest::new(user, strategy.into(), limit.unwrap_or(default_limit));
            request.neighbors = k;
            request.exclude = exclude;
            let response = recommender.recommend(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Users => {
            let store = recommender.store();
            for user in store.users() {
                let rated = store.rated_count(user).unwrap_or_default();
                println!("{user}\t{rated}");
            }
        }
    }

    Ok(())
}
