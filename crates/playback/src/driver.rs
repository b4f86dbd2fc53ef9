use geodesy::{Coordinate, haversine_m};
use routing::Route;

/// Fixed marker speed: 20 km/h, in meters per second.
pub const CRUISE_SPEED_MPS: f64 = 20_000.0 / 3600.0;

/// Travel time over `distance_m` at the fixed cruise speed, in seconds.
pub fn eta_at_cruise_s(distance_m: f64) -> f64 {
    distance_m / CRUISE_SPEED_MPS
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Advances a marker along route geometry at a constant speed.
///
/// The cursor is cumulative distance traveled (meters), always within
/// `[0, total]`. Advancement is driven by elapsed wall-clock deltas, so the
/// average speed over the whole route is frame-rate independent.
///
/// Per-vertex cumulative distances are computed once at adoption; each
/// position lookup is a binary search plus one interpolation, never a
/// rescan of the polyline.
#[derive(Debug, Clone)]
pub struct Playback {
    vertices: Vec<Coordinate>,
    cumulative_m: Vec<f64>,
    total_m: f64,
    cursor_m: f64,
    state: PlaybackState,
}

impl Playback {
    pub fn new(route: &Route) -> Self {
        let vertices = route.geometry.clone();
        let mut cumulative_m = Vec::with_capacity(vertices.len());
        if !vertices.is_empty() {
            cumulative_m.push(0.0);
        }
        let mut acc = 0.0;
        for pair in vertices.windows(2) {
            acc += haversine_m(pair[0], pair[1]);
            cumulative_m.push(acc);
        }

        Self {
            vertices,
            cumulative_m,
            // The state machine runs against the service-reported total; the
            // cumulative table only maps the cursor back onto the polyline.
            total_m: route.distance_m,
            cursor_m: 0.0,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor_m(&self) -> f64 {
        self.cursor_m
    }

    pub fn total_m(&self) -> f64 {
        self.total_m
    }

    /// Fraction of the route traveled, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_m <= 0.0 {
            return 0.0;
        }
        (self.cursor_m / self.total_m).clamp(0.0, 1.0)
    }

    /// Idle -> Running. No-op in any other state.
    pub fn start(&mut self) {
        if self.state == PlaybackState::Idle {
            self.state = PlaybackState::Running;
        }
    }

    /// Running -> Paused. Idempotent; the cursor is untouched.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
        }
    }

    /// Paused -> Running. No-op in any other state.
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Running;
        }
    }

    /// Any state -> Idle with the cursor back at the origin.
    pub fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.cursor_m = 0.0;
    }

    /// Advances the cursor by one frame's elapsed time, in seconds.
    ///
    /// Only meaningful while Running; in every other state (and for
    /// nonpositive deltas) this is a no-op. Transitions to Finished when the
    /// clamped cursor reaches the route total.
    pub fn tick(&mut self, dt_s: f64) {
        if self.state != PlaybackState::Running || dt_s <= 0.0 {
            return;
        }

        self.cursor_m = (self.cursor_m + CRUISE_SPEED_MPS * dt_s).clamp(0.0, self.total_m);
        if self.cursor_m >= self.total_m {
            self.state = PlaybackState::Finished;
        }
    }

    /// Current marker position, interpolated between the two vertices whose
    /// cumulative distances bracket the cursor.
    ///
    /// `None` only when the route carried no geometry.
    pub fn position(&self) -> Option<Coordinate> {
        let first = *self.vertices.first()?;
        let last = *self.vertices.last()?;

        if self.cursor_m <= 0.0 {
            return Some(first);
        }
        // The service-reported total can slightly exceed the polyline length;
        // anything past the last vertex pins to it.
        if self.cursor_m >= *self.cumulative_m.last()? {
            return Some(last);
        }

        let upper = self.cumulative_m.partition_point(|&d| d <= self.cursor_m);
        let lower = upper - 1;

        let span = self.cumulative_m[upper] - self.cumulative_m[lower];
        if span <= 0.0 {
            return Some(self.vertices[upper]);
        }
        let t = (self.cursor_m - self.cumulative_m[lower]) / span;
        Some(self.vertices[lower].lerp(self.vertices[upper], t))
    }
}
