//! Great-circle distance and mint-radius gating.

use geoconv::{haversine_distance, Degrees};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the spherical model.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Default maximum distance from a landmark at which minting is allowed.
pub const MINT_RADIUS_METERS: f64 = 500.0;

/// WGS84 latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    fn degrees(self) -> (Degrees, Degrees) {
        (Degrees::new(self.lat), Degrees::new(self.lng))
    }
}

/// Haversine distance in meters on a sphere of [`EARTH_RADIUS_METERS`].
///
/// Inputs are not range-checked. Identical points yield exactly zero.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    haversine_distance(a.degrees(), b.degrees()).as_float()
}

/// Inclusive radius check.
pub fn is_eligible(distance_m: f64, radius_m: f64) -> bool {
    distance_m <= radius_m
}

/// Compact display form: `12.3k` above a kilometre, whole meters below.
pub fn format_distance(distance_m: f64) -> String {
    if distance_m > 1000.0 {
        format!("{:.1}k", distance_m / 1000.0)
    } else {
        format!("{}m", distance_m.round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KATHMANDU: Coordinate = Coordinate::new(27.704, 85.307);
    const POON_HILL: Coordinate = Coordinate::new(28.397, 83.684);
    const EVEREST_BC: Coordinate = Coordinate::new(28.004, 86.858);

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_meters(KATHMANDU, KATHMANDU), 0.0);
        for c in [
            POON_HILL,
            EVEREST_BC,
            Coordinate::new(0.0, 0.0),
            Coordinate::new(90.0, 180.0),
            Coordinate::new(-45.5, -120.25),
        ] {
            assert_eq!(distance_meters(c, c), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (KATHMANDU, POON_HILL),
            (POON_HILL, EVEREST_BC),
            (Coordinate::new(-33.9, 151.2), Coordinate::new(51.5, -0.12)),
            (Coordinate::new(0.0, 179.9), Coordinate::new(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            let ab = distance_meters(a, b);
            let ba = distance_meters(b, a);
            assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0), "{ab} vs {ba}");
        }
    }

    #[test]
    fn test_kathmandu_to_poon_hill() {
        // ~176.9 km on the spherical model.
        let d = distance_meters(KATHMANDU, POON_HILL);
        assert!((165_000.0..=180_000.0).contains(&d), "got {d}");
        assert!((d - 176_929.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_matches_closed_form() {
        let (a, b) = (KATHMANDU, POON_HILL);
        let h = ((b.lat - a.lat).to_radians() / 2.0).sin().powi(2)
            + a.lat.to_radians().cos()
                * b.lat.to_radians().cos()
                * ((b.lng - a.lng).to_radians() / 2.0).sin().powi(2);
        let expected = EARTH_RADIUS_METERS * 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        assert!((distance_meters(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian_is_short() {
        let d = distance_meters(Coordinate::new(0.0, 179.9), Coordinate::new(0.0, -179.9));
        assert!(d < 25_000.0, "got {d}");
    }

    #[test]
    fn test_small_offset_within_radius() {
        // 0.004 degrees of latitude is ~445 m.
        let near = Coordinate::new(KATHMANDU.lat + 0.004, KATHMANDU.lng);
        let d = distance_meters(KATHMANDU, near);
        assert!((440.0..450.0).contains(&d), "got {d}");
        assert!(is_eligible(d, MINT_RADIUS_METERS));

        let far = Coordinate::new(KATHMANDU.lat + 0.005, KATHMANDU.lng);
        assert!(!is_eligible(distance_meters(KATHMANDU, far), MINT_RADIUS_METERS));
    }

    #[test]
    fn test_eligibility_is_inclusive() {
        assert!(is_eligible(500.0, 500.0));
        assert!(!is_eligible(500.0001, 500.0));
        assert!(is_eligible(0.0, 500.0));
    }

    #[test]
    fn test_range_check() {
        assert!(KATHMANDU.is_in_range());
        assert!(Coordinate::new(-90.0, 180.0).is_in_range());
        assert!(!Coordinate::new(90.1, 0.0).is_in_range());
        assert!(!Coordinate::new(0.0, -180.5).is_in_range());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_in_range());
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(499.6), "500m");
        assert_eq!(format_distance(1000.0), "1000m");
        assert_eq!(format_distance(176_929.4), "176.9k");
    }
}
