mod cli;
mod config;
mod document;
mod errors;
mod filler;
mod models;
mod routes;
mod state;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::filler::default_template_layout;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let layout = default_template_layout();

    match cli.command {
        Command::Serve { host, port } => serve(config, layout, host, port).await,
        Command::Fill {
            template,
            data,
            output,
        } => cli::run_fill(&layout, &template, &data, &output),
        Command::Submit {
            url,
            template,
            data,
            output,
        } => cli::run_submit(&url, &template, &data, &output).await,
    }
}

async fn serve(
    config: Config,
    layout: filler::layout::TemplateLayout,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    info!("Starting CV Filler API v{}", env!("CARGO_PKG_VERSION"));

    let host = host.unwrap_or_else(|| config.host.clone());
    let port = port.unwrap_or(config.port);
    info!(
        "Template layout: header {:?}, upload limit {} bytes",
        layout.header, config.max_upload_bytes
    );

    let state = AppState {
        config,
        layout: Arc::new(layout),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
