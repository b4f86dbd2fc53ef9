//! Single owner of selection, route, and playback state.
//!
//! All mutation goes through named methods so the whole click-to-animation
//! flow is testable without a browser or a network. The controller never
//! performs I/O itself: completing a selection yields a `FetchRequest` the
//! caller issues, and the response comes back through `adopt_result` tagged
//! with the same sequence token.

use geodesy::Coordinate;
use playback::{Playback, PlaybackState, eta_at_cruise_s};
use routing::{Profile, Route, RouteError};

use crate::selection::{ClickOutcome, Selection};

/// Identifies one issued route fetch in a deterministic, stable way.
///
/// Tokens are strictly increasing per controller, which is what makes the
/// last-request-wins rule a plain comparison instead of cancellation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

/// A fetch the caller should issue on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub seq: RequestSeq,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub profile: Profile,
}

/// What a recorded click asks of the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickResponse {
    /// Origin landed; waiting for the destination click.
    OriginSet,
    /// Selection completed; issue this fetch and feed the result back.
    Fetch(FetchRequest),
    /// Both slots were already taken; nothing changed.
    Ignored,
}

/// Display-ready figures for an adopted route.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RouteStats {
    /// Kilometers, rounded to one decimal place.
    pub distance_km: f64,
    /// Travel time the routing service itself estimated, seconds.
    pub service_duration_s: f64,
    /// Travel time at the fixed 20 km/h playback speed, seconds.
    pub eta_cruise_s: f64,
}

#[derive(Debug, Default)]
pub struct TripController {
    profile: Profile,
    selection: Selection,
    route: Option<Route>,
    playback: Option<Playback>,
    next_seq: u64,
    /// Most recently issued fetch, if its result has not arrived yet.
    pending: Option<RequestSeq>,
    last_error: Option<RouteError>,
}

impl TripController {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn last_error(&self) -> Option<&RouteError> {
        self.last_error.as_ref()
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a map click. A completed selection always issues a fresh
    /// fetch; results are never cached or deduplicated.
    pub fn record_click(&mut self, point: Coordinate) -> ClickResponse {
        match self.selection.record_click(point) {
            ClickOutcome::OriginSet => ClickResponse::OriginSet,
            ClickOutcome::Ignored => ClickResponse::Ignored,
            ClickOutcome::SelectionComplete => {
                // pair() cannot fail right after SelectionComplete.
                let (origin, destination) = self
                    .selection
                    .pair()
                    .unwrap_or((point, point));
                let seq = RequestSeq(self.next_seq);
                self.next_seq += 1;
                self.pending = Some(seq);
                ClickResponse::Fetch(FetchRequest {
                    seq,
                    origin,
                    destination,
                    profile: self.profile,
                })
            }
        }
    }

    /// User-initiated clear: empties the selection, invalidates any
    /// in-progress playback, and orphans an outstanding fetch so a late
    /// result cannot win over a newer one. The last adopted route stays
    /// displayed until a newer successful fetch replaces it.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.pending = None;
        self.last_error = None;
        if let Some(p) = &mut self.playback {
            p.reset();
        }
    }

    /// Applies one fetch result.
    ///
    /// Only the most recently issued, still-outstanding request is honored;
    /// anything else is stale and returns `false` without touching state.
    /// A failed fetch surfaces as `last_error` and leaves the previously
    /// adopted route (and its playback) in place.
    pub fn adopt_result(&mut self, seq: RequestSeq, result: Result<Route, RouteError>) -> bool {
        if self.pending != Some(seq) {
            return false;
        }
        self.pending = None;

        match result {
            Ok(route) => {
                self.playback = Some(Playback::new(&route));
                self.route = Some(route);
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(err);
            }
        }
        true
    }

    /// Playback controls. Each is a no-op without an adopted route.
    pub fn start(&mut self) {
        if let Some(p) = &mut self.playback {
            p.start();
        }
    }

    pub fn pause(&mut self) {
        if let Some(p) = &mut self.playback {
            p.pause();
        }
    }

    pub fn resume(&mut self) {
        if let Some(p) = &mut self.playback {
            p.resume();
        }
    }

    pub fn reset(&mut self) {
        if let Some(p) = &mut self.playback {
            p.reset();
        }
    }

    pub fn tick(&mut self, dt_s: f64) {
        if let Some(p) = &mut self.playback {
            p.tick(dt_s);
        }
    }

    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.playback.as_ref().map(|p| p.state())
    }

    pub fn marker_position(&self) -> Option<Coordinate> {
        self.playback.as_ref()?.position()
    }

    pub fn stats(&self) -> Option<RouteStats> {
        let route = self.route.as_ref()?;
        Some(RouteStats {
            distance_km: (route.distance_km() * 10.0).round() / 10.0,
            service_duration_s: route.duration_s,
            eta_cruise_s: eta_at_cruise_s(route.distance_m),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ClickResponse, RequestSeq, TripController};
    use geodesy::Coordinate;
    use playback::PlaybackState;
    use routing::{Profile, Route, RouteError};

    fn p(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn route(distance_m: f64) -> Route {
        Route {
            geometry: vec![p(0.0, 0.0), p(0.0, 1.0)],
            distance_m,
            duration_s: 60.0,
        }
    }

    fn complete_selection(ctl: &mut TripController) -> RequestSeq {
        assert_eq!(ctl.record_click(p(1.0, 1.0)), ClickResponse::OriginSet);
        match ctl.record_click(p(2.0, 2.0)) {
            ClickResponse::Fetch(req) => req.seq,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    #[test]
    fn completed_selection_requests_a_fetch() {
        let mut ctl = TripController::new(Profile::Driving);
        let first = ctl.record_click(p(1.0, 1.0));
        assert_eq!(first, ClickResponse::OriginSet);

        let ClickResponse::Fetch(req) = ctl.record_click(p(2.0, 2.0)) else {
            panic!("expected a fetch request");
        };
        assert_eq!(req.origin, p(1.0, 1.0));
        assert_eq!(req.destination, p(2.0, 2.0));
        assert_eq!(req.profile, Profile::Driving);

        // Third click changes nothing.
        assert_eq!(ctl.record_click(p(3.0, 3.0)), ClickResponse::Ignored);
    }

    #[test]
    fn adopting_a_route_enables_playback() {
        let mut ctl = TripController::new(Profile::Driving);
        let seq = complete_selection(&mut ctl);

        assert!(ctl.adopt_result(seq, Ok(route(1000.0))));
        assert_eq!(ctl.playback_state(), Some(PlaybackState::Idle));

        ctl.start();
        ctl.tick(180.0);
        assert_eq!(ctl.playback_state(), Some(PlaybackState::Finished));
    }

    #[test]
    fn only_the_latest_fetch_result_is_adopted() {
        let mut ctl = TripController::new(Profile::Driving);
        let seq1 = complete_selection(&mut ctl);

        // Re-selection while the first fetch is still in flight.
        ctl.clear();
        let seq2 = complete_selection(&mut ctl);
        assert_ne!(seq1, seq2);

        // Results arrive out of order: newest first, stale second.
        assert!(ctl.adopt_result(seq2, Ok(route(2000.0))));
        assert!(!ctl.adopt_result(seq1, Ok(route(1000.0))));
        assert_eq!(ctl.route().unwrap().distance_m, 2000.0);

        // Stale result in arrival order too.
        assert!(!ctl.adopt_result(seq1, Err(RouteError::NoRouteFound)));
        assert!(ctl.last_error().is_none());
    }

    #[test]
    fn fetch_error_keeps_the_previous_route() {
        let mut ctl = TripController::new(Profile::Driving);
        let seq1 = complete_selection(&mut ctl);
        assert!(ctl.adopt_result(seq1, Ok(route(1000.0))));

        ctl.clear();
        let seq2 = complete_selection(&mut ctl);
        assert!(ctl.adopt_result(seq2, Err(RouteError::NoRouteFound)));

        assert_eq!(ctl.last_error(), Some(&RouteError::NoRouteFound));
        // The previously adopted route is still on display.
        assert_eq!(ctl.route().unwrap().distance_m, 1000.0);
    }

    #[test]
    fn clear_orphans_an_outstanding_fetch() {
        let mut ctl = TripController::new(Profile::Driving);
        let seq = complete_selection(&mut ctl);
        ctl.clear();

        assert!(!ctl.adopt_result(seq, Ok(route(1000.0))));
        assert!(ctl.route().is_none());
        assert_eq!(ctl.playback_state(), None);
    }

    #[test]
    fn clear_invalidates_a_running_playback() {
        let mut ctl = TripController::new(Profile::Driving);
        let seq = complete_selection(&mut ctl);
        assert!(ctl.adopt_result(seq, Ok(route(1000.0))));

        ctl.start();
        ctl.tick(18.0);
        ctl.clear();

        assert_eq!(ctl.playback_state(), Some(PlaybackState::Idle));
        ctl.tick(18.0);
        assert_eq!(ctl.playback_state(), Some(PlaybackState::Idle));
    }

    #[test]
    fn playback_controls_without_a_route_are_noops() {
        let mut ctl = TripController::new(Profile::Driving);
        ctl.start();
        ctl.tick(10.0);
        ctl.pause();
        ctl.reset();
        assert_eq!(ctl.playback_state(), None);
        assert_eq!(ctl.marker_position(), None);
    }

    #[test]
    fn stats_round_distance_and_derive_cruise_eta() {
        let mut ctl = TripController::new(Profile::Driving);
        let seq = complete_selection(&mut ctl);
        assert!(ctl.adopt_result(
            seq,
            Ok(Route {
                geometry: vec![p(0.0, 0.0), p(0.0, 1.0)],
                distance_m: 10_000.0,
                duration_s: 720.0,
            })
        ));

        let stats = ctl.stats().unwrap();
        assert_eq!(stats.distance_km, 10.0);
        assert_eq!(stats.service_duration_s, 720.0);
        assert_eq!(stats.eta_cruise_s, 1800.0);
    }
}
