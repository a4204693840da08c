use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;

use crypto_prices::app;
use crypto_prices::config::AppConfig;
use crypto_prices::db::schema;
use crypto_prices::external::binance::BinanceClient;
use crypto_prices::logging::{init_logging, LoggingConfig};
use crypto_prices::services::{analysis_service, collector_service};
use crypto_prices::state::{ApiMode, AppState, DashboardState};

#[derive(Parser)]
#[command(name = "crypto-prices")]
#[command(about = "Daily crypto price collector, analyzer and query API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the crypto_prices table and indexes
    InitDb,

    /// Download hourly candles, keep one price per day, store and back up
    Collect {
        /// Only these pairs (comma separated, e.g. "BTCUSDT,ETHUSDT")
        #[arg(long)]
        symbols: Option<String>,
    },

    /// Compute monthly, overall and weekly views from the CSV backups
    Analyze,

    /// Serve the read-only query API
    Serve {
        /// strict (422 on bad input) or lenient (clamp)
        #[arg(long, default_value = "strict")]
        mode: ApiMode,

        /// Defaults to 8000 in strict mode and 5000 in lenient mode
        #[arg(long)]
        port: Option<u16>,
    },

    /// Serve the analysis dashboard
    Dashboard {
        #[arg(long, default_value_t = 8050)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env()?.with_level(cli.log_level.as_deref()))?;

    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            schema::prepare(&pool).await?;
            pool.close().await;
        }
        Commands::Collect { symbols } => {
            let pairs = config.select_pairs(symbols.as_deref())?;
            let pool = connect(&config).await?;
            schema::prepare(&pool).await?;

            let client = BinanceClient::from_config(&config.collector);
            info!("Collecting {} pairs from {}", pairs.len(), config.collector.binance_base_url);
            let stats = collector_service::run_collection(&pool, &client, &config, &pairs).await;
            stats.log_summary("daily price collection");
            pool.close().await;
        }
        Commands::Analyze => {
            let report = tokio::task::spawn_blocking(move || analysis_service::run_analysis(&config))
                .await??;
            info!(
                "Analyzed {} observations, wrote {} files",
                report.observations,
                report.written.len()
            );
        }
        Commands::Serve { mode, port } => {
            let pool = connect(&config).await?;
            let router = app::create_app(AppState { pool, mode });
            let port = port.unwrap_or_else(|| mode.default_port());
            serve(&config.api_host, port, router, "query API").await?;
        }
        Commands::Dashboard { port } => {
            let router = app::create_dashboard(DashboardState {
                data_dir: config.data_dir.clone(),
                pairs: config.pairs.clone(),
            });
            serve(&config.api_host, port, router, "dashboard").await?;
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    info!("Connected to the database");
    Ok(pool)
}

async fn serve(host: &str, port: u16, router: axum::Router, name: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 {} running at http://{}/", name, addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
