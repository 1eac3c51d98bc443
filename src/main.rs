use clap::{Parser, Subcommand};
use movie_etl::config::Config;
use movie_etl::enrich::{OmdbClient, RateLimitedEnricher};
use movie_etl::error::Result;
use movie_etl::load::SqliteLoader;
use movie_etl::pipeline::{Pipeline, RunMetrics};
use movie_etl::{extract, logging, query};
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "movie_etl")]
#[command(about = "Movie ratings ETL pipeline with OMDb metadata enrichment")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extract-transform-enrich-load pipeline
    Run,
    /// Execute a SQL file against the loaded database and print the results
    Query {
        /// Path to the SQL file
        #[arg(long, default_value = "queries.sql")]
        file: String,
    },
}

async fn run_pipeline(config: &Config) -> Result<RunMetrics> {
    info!("PHASE 1: EXTRACTING DATA");
    println!("📥 Loading source files...");
    let movies = extract::read_movies(&config.sources.movies_csv)?;
    let ratings = extract::read_ratings(&config.sources.ratings_csv)?;

    let service = OmdbClient::new(&config.omdb)?;
    let enricher = RateLimitedEnricher::new(
        Box::new(service),
        Duration::from_millis(config.omdb.delay_ms),
    );
    let loader = SqliteLoader::open(&config.database.path)?;
    info!("Connected to database: {}", config.database.path);

    let mut pipeline = Pipeline::new(enricher, Box::new(loader), config.pipeline.max_movies);
    pipeline.run(movies, ratings).await
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Run => {
            info!("Starting Movie Data Pipeline");
            println!("🚀 Starting movie data pipeline...");

            match run_pipeline(&config).await {
                Ok(metrics) => {
                    info!("PIPELINE COMPLETED SUCCESSFULLY!");
                    println!("\n✅ Pipeline completed successfully!");
                    println!("   Movies processed: {}", metrics.movies_processed);
                    println!("   Ratings loaded: {}", metrics.ratings_loaded);
                    println!("   Genres identified: {}", metrics.genres_identified);
                    println!("   API calls made: {}", metrics.api_calls);
                    println!("   Total execution time: {:.2} seconds", metrics.duration_secs);
                    println!("   Database: {}", config.database.path);
                }
                Err(e) => {
                    error!("PIPELINE FAILED: {}", e);
                    eprintln!("\n❌ Pipeline failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Query { file } => {
            if let Err(e) = query::run_query_file(&config.database.path, &file) {
                error!("Query run failed: {}", e);
                eprintln!("❌ Query run failed: {e}");
                std::process::exit(1);
            }
        }
    }
}
