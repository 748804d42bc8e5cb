//! HTTP surface: the Open-Graph image endpoint and the RSS feed.
//!
//! Each request runs one pipeline instance to completion. The only shared
//! mutable state across requests is the font cache, which is write-once.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::NaiveDate;

use crate::assets::fonts::FontStore;
use crate::chart::wheel::compose_wheel;
use crate::config::ServeConfig;
use crate::feed::{FEED_ITEM_COUNT, build_feed};
use crate::foundation::error::{VoidwireError, VoidwireResult};
use crate::render::card::compose_card;
use crate::render::raster::rasterize_card;
use crate::upstream::UpstreamClient;

const OG_CACHE_CONTROL: &str = "public, max-age=86400, s-maxage=86400";
const FEED_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServeConfig>,
    pub upstream: UpstreamClient,
    pub fonts: FontStore,
}

impl AppState {
    pub fn from_config(config: ServeConfig) -> VoidwireResult<Self> {
        let upstream = UpstreamClient::new(config.upstream_url.clone())?;
        let fonts = FontStore::new(config.font_dirs.clone());
        Ok(Self {
            config: Arc::new(config),
            upstream,
            fonts,
        })
    }
}

pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/og/{date}", get(og_image))
        .route("/feed.xml", get(feed_xml))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: ServeConfig) -> VoidwireResult<()> {
    let bind = config.bind.clone();
    let state = AppState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| VoidwireError::validation(format!("bind {bind}: {e}")))?;
    tracing::info!(%bind, "voidwire listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|e| VoidwireError::Other(anyhow::Error::new(e)))
}

/// JSON error payload for the image endpoint; no internal details beyond the
/// message string are leaked.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<VoidwireError> for ApiError {
    fn from(err: VoidwireError) -> Self {
        tracing::error!(error = %err, "request pipeline failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// `GET /og/<date>.png`
#[tracing::instrument(skip(state))]
async fn og_image(
    State(state): State<AppState>,
    Path(date_param): Path<String>,
) -> Result<Response, ApiError> {
    let date = resolve_date(&date_param)
        .ok_or_else(|| ApiError::not_found(format!("no such image: {date_param}")))?;
    let date_str = date.format("%Y-%m-%d").to_string();

    // The two upstream fetches and the font load are the only fan-out point;
    // all three are awaited jointly before composition proceeds.
    let fonts_store = state.fonts.clone();
    let (reading, ephemeris, fonts) = tokio::join!(
        state.upstream.fetch_reading(&date_str),
        state.upstream.fetch_ephemeris(&date_str),
        tokio::task::spawn_blocking(move || fonts_store.get()),
    );
    let fonts = fonts
        .map_err(|e| VoidwireError::render(format!("font load task failed: {e}")))
        .and_then(|r| r)?;

    let snapshot = ephemeris.unwrap_or_default();
    let reading = reading.into_option();
    let date_label = date.format("%B %-d, %Y").to_string();

    let png = tokio::task::spawn_blocking(move || {
        let wheel = compose_wheel(&snapshot);
        let ops = compose_card(&date_label, reading.as_ref(), wheel);
        rasterize_card(&ops, &fonts)
    })
    .await
    .map_err(|e| VoidwireError::render(format!("render task failed: {e}")))
    .and_then(|r| r)?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, OG_CACHE_CONTROL)
        .body(Body::from(png))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}

/// `GET /feed.xml`
#[tracing::instrument(skip(state))]
async fn feed_xml(State(state): State<AppState>) -> Response {
    let entries = state
        .upstream
        .fetch_archive(FEED_ITEM_COUNT)
        .await
        .unwrap_or_default();
    let xml = build_feed(&state.config, &entries);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/rss+xml")
        .header(header::CACHE_CONTROL, FEED_CACHE_CONTROL)
        .body(Body::from(xml))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Extract the calendar date from an `<date>.png` path segment.
fn resolve_date(param: &str) -> Option<NaiveDate> {
    let stem = param.strip_suffix(".png")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
