//! LangRAG web client server
//!
//! Entry point: loads configuration, builds the backend client and serves the
//! web UI.

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use langrag_web::backend::{DocumentBackend, HttpBackend};
use langrag_web::config::AppConfig;
use langrag_web::server;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before anything reads the environment
    let _ = dotenv();

    init_tracing();

    let config = Arc::new(AppConfig::load().context("Failed to load configuration")?);

    let api_url = config.backend.resolved_api_url();
    let backend: Arc<dyn DocumentBackend> = Arc::new(
        HttpBackend::new(&api_url)
            .with_context(|| format!("Invalid backend URL: {api_url}"))?,
    );

    info!(
        name: "backend.config.loaded",
        api_url = %api_url,
        max_files = config.upload.max_files,
        accepted_types = %config.upload.accepted_types.join(","),
        "Backend configuration loaded"
    );

    server::start_server(config, backend).await
}

/// Initialize tracing (M-LOG-STRUCTURED). `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
