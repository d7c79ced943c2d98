use anyhow::Result;
use clap::{Parser, Subcommand};

/// storefront - session-authenticated storefront API
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront API server", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = storefront::config::Config::load(cli.config)?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    storefront::observability::init_observability(
        "storefront",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => storefront::server::serve(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: storefront::config::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = storefront::db::create_pool(&config.database.url, 1).await?;
    storefront::db::migrate(&pool).await?;
    pool.close().await;

    Ok(())
}
