use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use questoes_api::config::Settings;
use questoes_api::db::{health, Gateway};
use questoes_api::server::app::{run_server, AppState};
use questoes_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on, overrides PORT
    #[clap(long)]
    port: Option<u16>,
    /// Directory with the front-end files, overrides STATIC_DIR
    #[clap(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut settings = Settings::from_env().context("Failed to read settings, is URL_BD set?")?;
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        settings.static_dir = static_dir;
    }

    let gateway = Gateway::connect(
        &settings.url_bd,
        settings.max_connections,
        settings.acquire_timeout(),
    )
    .context("URL_BD is not a valid connection string")?;

    // the service starts even when the database is down; the outcome is
    // only reported through /api-status
    let db_status = health::check(&gateway).await;

    let gateway = Arc::new(gateway);
    let state = AppState::new(gateway.clone(), gateway, db_status);
    run_server(state, &settings.address(), &settings.static_dir).await
}
