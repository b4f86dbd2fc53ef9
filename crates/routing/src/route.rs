use geodesy::Coordinate;

/// Routing mode understood by the OSRM `/route/v1/{profile}/` endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Driving => "driving",
            Profile::Walking => "walking",
            Profile::Cycling => "cycling",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "driving" => Some(Profile::Driving),
            "walking" => Some(Profile::Walking),
            "cycling" => Some(Profile::Cycling),
            _ => None,
        }
    }
}

/// One computed route as reported by the routing service.
///
/// Geometry is in traversal order, latitude-first. Immutable once fetched;
/// a new fetch replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub geometry: Vec<Coordinate>,
    /// Total length in meters.
    pub distance_m: f64,
    /// Service-estimated travel time in seconds.
    pub duration_s: f64,
}

impl Route {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }
}
