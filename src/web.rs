//! HTTP surface of the departure board
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::departure_fetcher::DepartureFetcher;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
struct AppState {
    fetcher: Arc<DepartureFetcher>,
}

pub fn router(fetcher: DepartureFetcher) -> Router {
    let state = AppState {
        fetcher: Arc::new(fetcher),
    };

    Router::new()
        .route("/", get(index))
        .route("/api/tram_time", get(tram_time))
        .with_state(state)
}

pub async fn serve(bind_address: &str, fetcher: DepartureFetcher) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("couldn't bind {bind_address}"))?;

    info!("serving departures on http://{}", listener.local_addr()?);

    axum::serve(listener, router(fetcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("couldn't listen for ctrl-c {e}");
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn tram_time(State(state): State<AppState>) -> Response {
    match state.fetcher.fetch_board(Utc::now()).await {
        Ok(board) => Json(board).into_response(),
        Err(e) if e.is_upstream_failure() => {
            error!("{e}");
            Json(json!({ "error": "Could not fetch data" })).into_response()
        }
        Err(e) => {
            error!("{:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}")).into_response()
        }
    }
}
