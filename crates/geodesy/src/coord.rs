/// Geographic coordinate in degrees, latitude first.
///
/// The wire format of most routing services is longitude-first; conversion
/// happens at the client boundary, never here.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `None` when either component is outside the valid
    /// latitude/longitude range.
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let c = Self { lat, lon };
        c.in_bounds().then_some(c)
    }

    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Linear interpolation toward `other`, `t` in `[0, 1]`.
    ///
    /// Planar approximation. Adequate for marker placement along dense
    /// road geometry where consecutive vertices are tens of meters apart.
    pub fn lerp(&self, other: Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}
