use crate::coord::Coordinate;

/// Mean Earth radius (meters), the value routing services use for
/// spherical distance.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Sum of segment lengths along a polyline, in meters.
pub fn path_length_m(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::{haversine_m, path_length_m};
    use crate::coord::Coordinate;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let p = Coordinate::new(18.525, 73.847);
        assert_eq!(haversine_m(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        // pi/180 * R = 111194.9...
        assert_close(haversine_m(a, b), 111_194.9, 1.0);
    }

    #[test]
    fn path_length_sums_segments() {
        let path = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.5, 0.0),
            Coordinate::new(1.0, 0.0),
        ];
        let direct = haversine_m(path[0], path[2]);
        assert_close(path_length_m(&path), direct, 1e-6);
    }

    #[test]
    fn empty_and_single_point_paths_have_zero_length() {
        assert_eq!(path_length_m(&[]), 0.0);
        assert_eq!(path_length_m(&[Coordinate::new(1.0, 2.0)]), 0.0);
    }
}
