use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use meteo_core::{Dashboard, DashboardError, Filters, ViewModel, WeatherSource};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub fn router<S: WeatherSource + 'static>(dashboard: Arc<Dashboard<S>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/view", get(view::<S>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

pub async fn serve<S: WeatherSource + 'static>(
    dashboard: Arc<Dashboard<S>>,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("weather dashboard listening on http://{addr}");
    axum::serve(listener, router(dashboard))
        .await
        .context("Dashboard server stopped unexpectedly")
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/dashboard.html"))
}

async fn health() -> &'static str {
    "ok"
}

async fn view<S: WeatherSource + 'static>(
    State(dashboard): State<Arc<Dashboard<S>>>,
    Query(filters): Query<Filters>,
) -> Result<Json<ViewModel>, ApiError> {
    let view = dashboard.render(&filters).await?;
    Ok(Json(view))
}

/// A render that could not produce a page.
#[derive(Debug)]
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "dashboard render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
