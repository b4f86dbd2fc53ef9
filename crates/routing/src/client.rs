//! OSRM route client.
//!
//! One HTTP GET per fetch, no retry, no cache. The URL builder and body
//! parser are pure functions so the wire contract is testable without a
//! network.

use geodesy::Coordinate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::route::{Profile, Route};

/// Error type for route fetches.
///
/// Every variant is recoverable at the UI boundary; none of these should
/// tear down a session.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Routing service answered with a non-2xx status.
    Service { status: u16 },
    /// Service answered 2xx but reported zero routes between the points.
    NoRouteFound,
    /// Body was not JSON, or the expected fields were missing.
    MalformedResponse { reason: String },
    /// Request could not be sent or completed.
    Network { reason: String },
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::Service { status } => {
                write!(f, "routing service error: status {status}")
            }
            RouteError::NoRouteFound => write!(f, "no route found between the selected points"),
            RouteError::MalformedResponse { reason } => {
                write!(f, "malformed routing response: {reason}")
            }
            RouteError::Network { reason } => write!(f, "routing request failed: {reason}"),
        }
    }
}

impl std::error::Error for RouteError {}

/// Builds the OSRM request URL.
///
/// OSRM takes longitude-first pairs; internal `Coordinate` is latitude-first,
/// so the axis order flips here and nowhere else on the request path.
pub fn route_url(
    base_url: &str,
    profile: Profile,
    origin: Coordinate,
    destination: Coordinate,
) -> String {
    format!(
        "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson&alternatives=false&steps=false",
        base_url.trim_end_matches('/'),
        profile.as_str(),
        origin.lon,
        origin.lat,
        destination.lon,
        destination.lat,
    )
}

#[derive(Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Parses a routing service body into a `Route`.
///
/// The first (and only requested) route entry is used. Geometry pairs are
/// `[lon, lat]` on the wire and flipped to latitude-first here.
pub fn parse_route_body(body: &str) -> Result<Route, RouteError> {
    let parsed: OsrmRouteResponse =
        serde_json::from_str(body).map_err(|e| RouteError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let Some(first) = parsed.routes.into_iter().next() else {
        return Err(RouteError::NoRouteFound);
    };

    let geometry = first
        .geometry
        .coordinates
        .iter()
        .map(|&[lon, lat]| Coordinate::new(lat, lon))
        .collect();

    Ok(Route {
        geometry,
        distance_m: first.distance,
        duration_s: first.duration,
    })
}

/// Async client for the routing service.
pub struct RouteClient {
    base_url: String,
    http: reqwest::Client,
}

impl RouteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one route. Single GET, no retry.
    ///
    /// Staleness handling (last-request-wins when fetches overlap) is the
    /// caller's concern; this client is free of request state.
    pub async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: Profile,
    ) -> Result<Route, RouteError> {
        let url = route_url(&self.base_url, profile, origin, destination);
        debug!("fetching route: {url}");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RouteError::Network {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("routing service returned {status} for {url}");
            return Err(RouteError::Service {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| RouteError::Network {
            reason: e.to_string(),
        })?;

        parse_route_body(&body)
    }
}
