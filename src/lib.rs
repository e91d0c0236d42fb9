pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use config::GeneralConfig;
use db::Store;
use services::{CatalogStore, MongoLogStore, SeaOrmCatalogStore, SearchService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    init_tracing(&config.general);
    config.log_sources();
    config.validate()?;

    let catalog_url = config.catalog.url()?;
    let store = Store::connect_lazy(
        &catalog_url,
        Duration::from_secs(config.catalog.connect_timeout_seconds),
    )
    .await
    .context("Failed to set up the catalog database pool")?;
    let catalog = Arc::new(SeaOrmCatalogStore::new(store));

    let log = match MongoLogStore::connect(
        &config.log_store.uri,
        &config.log_store.database,
        &config.log_store.collection,
    )
    .await
    {
        Ok(log) => Arc::new(log),
        Err(e) => {
            close_catalog(catalog).await;
            return Err(e).context("Invalid search log connection settings");
        }
    };

    let service = SearchService::new(catalog.clone(), log.clone())
        .with_limits(config.general.page_size, config.general.min_keyword_len);

    if !matches!(cli.command, Some(Commands::Check))
        && let Err(e) = catalog.ping().await
    {
        warn!(error = %e, "Catalog database unreachable at startup");
    }

    let result = dispatch(cli, &config, &service).await;

    drop(service);
    close_catalog(catalog).await;
    close_log(log).await;

    result
}

async fn dispatch(cli: Cli, config: &Config, service: &SearchService) -> anyhow::Result<()> {
    let json = cli.json;
    let stats_limit = config.general.stats_limit;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => cli::shell::run_shell(service, stats_limit, std::io::stdin().lock()).await,
        Commands::Genres => cli::cmd_genres(service, json).await,
        Commands::Details { id } => cli::cmd_details(service, id, json).await,
        Commands::Popular { limit } => {
            cli::cmd_popular(service, limit.unwrap_or(stats_limit), json).await
        }
        Commands::Recent { limit } => {
            cli::cmd_recent(service, limit.unwrap_or(stats_limit), json).await
        }
        Commands::Stats => cli::cmd_stats(service, json).await,
        Commands::History { date, kind, limit } => {
            cli::cmd_history(service, date, kind, limit, json).await
        }
        Commands::Purge {
            older_than_days,
            yes,
        } => cli::cmd_purge(service, older_than_days, yes).await,
        Commands::Check => cli::cmd_check(service).await,
    }
}

fn init_tracing(general: &GeneralConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let json = general.log_format.eq_ignore_ascii_case("json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn close_catalog(catalog: Arc<SeaOrmCatalogStore>) {
    match Arc::try_unwrap(catalog) {
        Ok(catalog) => {
            if let Err(e) = catalog.close().await {
                warn!(error = %e, "Failed to close catalog connection");
            }
        }
        Err(_) => warn!("Catalog connection still shared at shutdown"),
    }
}

async fn close_log(log: Arc<MongoLogStore>) {
    match Arc::try_unwrap(log) {
        Ok(log) => log.close().await,
        Err(_) => warn!("Log store connection still shared at shutdown"),
    }
    info!("Shutdown complete");
}
