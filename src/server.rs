//! Static host for the built page
//!
//! Two fixed routes and a static fallback:
//!
//! - `GET /` serves `<static_dir>/index.html`, or the configured greeting
//!   when the page has not been built
//! - `GET /bonus` serves `<static_dir>/bonus.html`
//! - anything else is looked up in the static directory

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::error::Result;

struct RootPage {
    index: PathBuf,
    greeting: String,
}

async fn root(State(page): State<Arc<RootPage>>) -> Response {
    match tokio::fs::read(&page.index).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            log::debug!("No {} ({}), answering with greeting", page.index.display(), e);
            page.greeting.clone().into_response()
        }
    }
}

/// Builds the router for `config`
pub fn router(config: &ServerConfig) -> Router {
    let page = Arc::new(RootPage {
        index: config.static_dir.join("index.html"),
        greeting: config.greeting.clone(),
    });
    Router::new()
        .route("/", get(root))
        .route_service("/bonus", ServeFile::new(config.static_dir.join("bonus.html")))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(page)
}

/// Serves on `0.0.0.0:<port>` until Ctrl-C
pub async fn run(config: &ServerConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!(
        "Serving {} on http://{}",
        config.static_dir.display(),
        listener.local_addr()?
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
