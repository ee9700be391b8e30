use anyhow::{Context, Result};
use clap::Parser;
use hackathon_judge::{create_router, AppState, Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hackathon-judge", version, about = "Hackathon judging service")]
struct Args {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/hackathon-judge")]
    config: String,

    /// Override the bind address
    #[arg(long, env = "JUDGE_BIND")]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(short, long, env = "JUDGE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    if cfg.llm.api_key.is_empty() {
        warn!("No language model API key configured; analysis and evaluation will fail");
    }
    if cfg.ocr.api_key.is_empty() {
        warn!("No OCR API key configured; document summaries will fail");
    }

    let state = AppState::from_config(&cfg)?;
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    info!("Submission links use {}", cfg.service.public_base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
