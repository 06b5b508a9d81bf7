//! Great-circle distance between two geographic points.
//!
//! Distances use the haversine formula on a spherical Earth with a mean
//! radius of 6371 km. Inputs are decimal degrees and are not range-checked
//! here; callers validate coordinates before they reach this module.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Unrounded haversine distance in kilometers.
///
/// # Example
///
/// ```
/// use schools::distance::haversine_km;
///
/// let d = haversine_km(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round a distance to 2 decimal places.
///
/// Uses [`f64::round`], which rounds half away from zero. Distances are never
/// negative, so an exact `.005` boundary always rounds up.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Great-circle distance in kilometers, rounded to 2 decimal places.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point in decimal degrees
/// * `lat2`, `lon2` - Second point in decimal degrees
///
/// # Example
///
/// ```
/// use schools::distance::distance_km;
///
/// // London to Paris
/// let d = distance_km(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((d - 343.56).abs() < 1.0);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    round_km(haversine_km(lat1, lon1, lat2, lon2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: (f64, f64) = (51.5074, -0.1278);
    const PARIS: (f64, f64) = (48.8566, 2.3522);
    const NEW_YORK: (f64, f64) = (40.7128, -74.0060);

    fn has_at_most_two_decimals(v: f64) -> bool {
        ((v * 100.0).round() - v * 100.0).abs() < 1e-6
    }

    #[test]
    fn test_identical_points() {
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(distance_km(LONDON.0, LONDON.1, LONDON.0, LONDON.1), 0.0);
        assert_eq!(distance_km(-89.9, 179.9, -89.9, 179.9), 0.0);
    }

    #[test]
    fn test_london_to_paris() {
        let d = distance_km(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        assert!((d - 343.56).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [(LONDON, PARIS), (PARIS, NEW_YORK), ((-33.86, 151.2), (35.68, 139.69))];
        for (a, b) in pairs {
            assert_eq!(distance_km(a.0, a.1, b.0, b.1), distance_km(b.0, b.1, a.0, a.1));
        }
    }

    #[test]
    fn test_triangle_inequality() {
        let ab = distance_km(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        let bc = distance_km(PARIS.0, PARIS.1, NEW_YORK.0, NEW_YORK.1);
        let ac = distance_km(LONDON.0, LONDON.1, NEW_YORK.0, NEW_YORK.1);
        assert!(ac <= ab + bc + 0.01);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance_km(0.0, 0.0, 0.0, 1.0);
        assert_eq!(d, 111.19);
    }

    #[test]
    fn test_antipodal_points() {
        // Half the circumference: pi * R
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert_eq!(d, round_km(std::f64::consts::PI * EARTH_RADIUS_KM));
        assert!(!d.is_nan());

        let poles = distance_km(90.0, 0.0, -90.0, 0.0);
        assert!((poles - 20015.09).abs() < 0.01);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_km(1.234), 1.23);
        assert_eq!(round_km(1.236), 1.24);
        assert_eq!(round_km(0.0), 0.0);
        // 0.125 is exactly representable, so it sits on the half boundary
        assert_eq!(round_km(0.125), 0.13);
    }

    #[test]
    fn test_at_most_two_decimals() {
        let points = [LONDON, PARIS, NEW_YORK, (12.345678, -98.7654321), (-45.1, 170.9)];
        for a in points {
            for b in points {
                let d = distance_km(a.0, a.1, b.0, b.1);
                assert!(d >= 0.0);
                assert!(has_at_most_two_decimals(d), "{} has more than 2 decimals", d);
            }
        }
    }
}
