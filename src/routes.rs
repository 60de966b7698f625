//! HTTP surface: the report endpoint, the client-key echo, and static assets.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::Error;
use crate::mail::Mailer;
use crate::notify;
use crate::report::LocationReport;

/// Shared request state: configuration plus the mailer handle.
///
/// The mailer is absent when SMTP credentials were not configured at startup;
/// the dispatch decision turns that into a degraded 200 response.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

/// Build the service router.
///
/// Unmatched paths fall through to the static client page directory, so
/// `GET /` serves its index file. CORS is permissive because the client page
/// may be rehosted behind tunnels with arbitrary origins.
pub fn api_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/log", post(log_location))
        .route("/api-keys", get(api_keys))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `POST /log`: receive a location report and relay it by email.
///
/// Validation is a hard gate: nothing is logged or dispatched for a payload
/// with bad coordinates. Every other outcome, including a transport failure,
/// responds 200 with the map link; the caller is a browser beaconing its
/// position and cannot remedy server-side mail problems.
async fn log_location(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, Error> {
    let report = LocationReport::from_value(&payload)?;
    let link = report.map_link();

    tracing::info!(
        lat = report.lat,
        lng = report.lng,
        vpn = report.vpn_detected(),
        time = %report.formatted_time(),
        "location received"
    );

    let outcome = notify::dispatch(&state.config, state.mailer.as_deref(), &report).await;

    Ok(Json(json!({
        "message": outcome.message(),
        "link": link,
    })))
}

#[derive(Serialize)]
struct ApiKeys {
    #[serde(rename = "ipinfoKey")]
    ipinfo_key: Option<String>,
    #[serde(rename = "vpnapiKey")]
    vpnapi_key: Option<String>,
}

/// `GET /api-keys`: echo the third-party lookup keys for the client page.
///
/// This hands the configured key values to any caller. Carried over verbatim
/// from the original interface; see DESIGN.md before exposing this service
/// beyond a trusted network.
async fn api_keys(State(state): State<AppState>) -> Json<ApiKeys> {
    Json(ApiKeys {
        ipinfo_key: state.config.ipinfo_key.clone(),
        vpnapi_key: state.config.vpnapi_key.clone(),
    })
}
