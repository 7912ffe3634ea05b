use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use customer_api::config::Config;
use customer_api::state::AppState;
use customer_core::{init_logging, logging_status, ConnectionPool};
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=api status=error error={err}");
            eprintln!("customer-api: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.validate()?;
    init_logging(config.log_level(), config.log_dir.as_deref())?;
    if let Some((level, target)) = logging_status() {
        info!("event=logging_ready module=api status=ok level={level} target={target}");
    }

    let pool = ConnectionPool::open(&config.db_path, config.pool_options())?;
    let state = AppState::new(pool, config.update_policy());
    let app = customer_api::app_with_cors(
        state,
        customer_api::build_cors(config.cors_allow_origins.as_deref()),
    );

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=api status=ok addr={} db_path={} pool_size={}",
        listener.local_addr()?,
        config.db_path.display(),
        config.db_pool_size
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=api status=error error={err}");
    }
}
