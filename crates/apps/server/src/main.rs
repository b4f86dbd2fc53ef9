use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use geodesy::Coordinate;
use playback::eta_at_cruise_s;
use routing::{Profile, Route, RouteClient, RouteError};

#[derive(Clone)]
struct AppState {
    client: Arc<RouteClient>,
    default_profile: Profile,
    static_root: PathBuf,
}

/// Compiled-in copies of the frontend assets, served when the static root
/// is missing (e.g. the binary runs from a directory other than the
/// workspace root). Keeps the page working without any on-disk assets.
fn builtin_asset(file: &str) -> Option<(&'static str, &'static str)> {
    match file {
        "index.html" => Some((include_str!("../static/index.html"), "text/html")),
        "app.js" => Some((include_str!("../static/app.js"), "text/javascript")),
        "style.css" => Some((include_str!("../static/style.css"), "text/css")),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let osrm_base_url =
        env::var("OSRM_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let default_profile = env::var("OSRM_PROFILE")
        .ok()
        .and_then(|v| Profile::parse(&v))
        .unwrap_or_default();
    let addr: SocketAddr = env::var("ROUTE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9300".to_string())
        .parse()
        .expect("invalid ROUTE_ADDR");
    let static_root = env::var("ROUTE_STATIC_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("crates/apps/server/static"));

    let state = AppState {
        client: Arc::new(RouteClient::new(osrm_base_url)),
        default_profile,
        static_root,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(get_index))
        .route("/static/:file", get(get_static))
        .route("/api/route", get(get_route))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    info!(
        "route server listening on http://{addr} (osrm: {})",
        state.client.base_url()
    );
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_index(State(state): State<AppState>) -> Response {
    serve_asset(&state, "index.html").await
}

async fn get_static(State(state): State<AppState>, AxumPath(file): AxumPath<String>) -> Response {
    // One flat directory of assets; anything with a path separator is not ours.
    if file.contains('/') || file.contains("..") {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    serve_asset(&state, &file).await
}

/// Serves a frontend asset from the static root, falling back to the
/// compiled-in copy when the file is unreadable.
async fn serve_asset(state: &AppState, file: &str) -> Response {
    let path = state.static_root.join(file);
    match tokio::fs::read(&path).await {
        Ok(data) => asset_response(Body::from(data), content_type_for(file)),
        Err(err) => match builtin_asset(file) {
            Some((body, content_type)) => {
                warn!("asset read failed: {path:?} -> {err}; serving built-in copy");
                asset_response(Body::from(body), content_type)
            }
            None => (StatusCode::NOT_FOUND, "not found").into_response(),
        },
    }
}

fn asset_response(body: Body, content_type: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    (StatusCode::OK, headers, body).into_response()
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,
    profile: Option<String>,
}

/// Server-side proxy for the one OSRM call, so browsers blocked by
/// cross-origin rules get an identical contract from the page's own origin.
async fn get_route(State(state): State<AppState>, Query(query): Query<RouteQuery>) -> Response {
    let (Some(origin), Some(destination)) = (
        Coordinate::checked(query.start_lat, query.start_lon),
        Coordinate::checked(query.end_lat, query.end_lon),
    ) else {
        return json_error(StatusCode::BAD_REQUEST, "Invalid coordinates provided");
    };

    let profile = match &query.profile {
        None => state.default_profile,
        Some(raw) => match Profile::parse(raw) {
            Some(p) => p,
            None => return json_error(StatusCode::BAD_REQUEST, "Unknown routing profile"),
        },
    };

    match state.client.fetch_route(origin, destination, profile).await {
        Ok(route) => json_ok(route_payload(&route)),
        Err(err) => {
            warn!("route fetch failed: {err}");
            json_error(error_status(&err), &err.to_string())
        }
    }
}

/// Normalized response shape for the frontend: lat-first pairs plus the
/// display figures, service duration and fixed-speed ETA side by side.
fn route_payload(route: &Route) -> serde_json::Value {
    let route_coords: Vec<[f64; 2]> = route.geometry.iter().map(|c| [c.lat, c.lon]).collect();
    json!({
        "success": true,
        "route_coords": route_coords,
        "distance_meters": round2(route.distance_m),
        "duration_seconds": round2(route.duration_s),
        "eta_20kmh_seconds": round2(eta_at_cruise_s(route.distance_m)),
    })
}

fn error_status(err: &RouteError) -> StatusCode {
    match err {
        RouteError::NoRouteFound => StatusCode::NOT_FOUND,
        RouteError::Service { .. } | RouteError::MalformedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        RouteError::Network { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn json_ok(body: serde_json::Value) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (StatusCode::OK, headers, Body::from(body.to_string())).into_response()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "success": false, "error": message });
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (status, headers, Body::from(body.to_string())).into_response()
}

fn content_type_for(file: &str) -> &'static str {
    match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
