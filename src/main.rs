//! Article Directory — Binary Entrypoint
//! Bootstraps the content load (taxonomies + provisional page), spawns the
//! background fan-out, and serves the read-only HTTP surface with Axum.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use article_directory::api::{self, AppState};
use article_directory::metrics::Metrics;
use article_directory::store::ArticleStore;
use article_directory::{config, ingest};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("article_directory=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = config::load_default()?;
    let metrics = Metrics::init(cfg.page_cap);
    let store = Arc::new(ArticleStore::new());

    // Taxonomies and the provisional page must land before we serve content;
    // the rest of the load continues in the background.
    let _load = ingest::start(&cfg, store.clone())
        .await
        .context("bootstrap load failed")?;

    let state = AppState {
        store,
        items_per_page: cfg.items_per_page,
    };
    let router = api::create_router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!(addr = %cfg.bind_addr, "article directory listening");

    axum::serve(listener, router).await?;
    Ok(())
}
