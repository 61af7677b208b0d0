//! Great-circle distance between coordinates.

use crate::api::Coordinates;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers.
///
/// Treats the Earth as a sphere of radius 6371 km, which is accurate to
/// well under a percent — far finer than the 100 m proximity threshold
/// this crate cares about.
///
/// # Examples
///
/// ```
/// use trainfriends_core::api::Coordinates;
/// use trainfriends_core::location::distance::haversine_km;
///
/// let marienplatz = Coordinates::new(48.1374, 11.5755);
/// let hauptbahnhof = Coordinates::new(48.1402, 11.5600);
/// let km = haversine_km(marienplatz, hauptbahnhof);
/// assert!(km > 1.0 && km < 1.5);
/// ```
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let point = Coordinates::new(48.1384, 11.5855);
        assert_eq!(haversine_km(point, point), 0.0);
    }

    #[test]
    fn adjacent_points_are_within_nearby_range() {
        // One ten-thousandth of a degree apart on both axes: about 13 m.
        let a = Coordinates::new(48.1384, 11.5855);
        let b = Coordinates::new(48.1385, 11.5856);

        let km = haversine_km(a, b);

        assert!(km > 0.010, "expected > 10 m, got {km} km");
        assert!(km < 0.020, "expected < 20 m, got {km} km");
        assert!(km <= 0.1);
    }

    #[test]
    fn distant_points_are_outside_nearby_range() {
        // Roughly 11 km apart, dominated by the latitude difference.
        let a = Coordinates::new(48.1384, 11.5855);
        let b = Coordinates::new(48.2374, 11.5751);

        let km = haversine_km(a, b);

        assert!(km > 10.0, "expected > 10 km, got {km} km");
        assert!(km < 12.0, "expected < 12 km, got {km} km");
        assert!(km > 0.1);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(48.1384, 11.5855);
        let b = Coordinates::new(48.2374, 11.5751);

        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);

        let km = haversine_km(a, b);

        // Half the equatorial great circle on the mean-radius sphere.
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }
}
