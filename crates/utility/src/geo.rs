use itertools::Itertools;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> ((f64, f64), (f64, f64)) {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    let lat_delta = radius_km / EARTH_RADIUS_KM;
    // longitude degrees shrink towards the poles, never divide by a zero cosine
    let lon_delta = radius_km / (EARTH_RADIUS_KM * lat_rad.cos().abs().max(1e-12));

    let min_lat = to_degrees(lat_rad - lat_delta).max(-90.0);
    let max_lat = to_degrees(lat_rad + lat_delta).min(90.0);
    let min_lon = to_degrees(lon_rad - lon_delta);
    let max_lon = to_degrees(lon_rad + lon_delta);

    ((min_lat, min_lon), (max_lat, max_lon))
}

/// Great-circle distance in km between two points given in decimal degrees.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    if latitude_1 == latitude_2 && longitude_1 == longitude_2 {
        return 0.0;
    }

    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);
    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` just outside [0, 1] near antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of the great-circle distances between consecutive `(lat, lon)` pairs.
pub fn path_length(points: &[(f64, f64)]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| haversine_distance(a.0, a.1, b.0, b.1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_distance(54.32, 10.13, 54.32, 10.13), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
        let back = haversine_distance(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((there - back).abs() < 1e-12);
        assert!((there - 343.5).abs() < 10.0);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!(distance.is_finite());
        assert!((distance - half_circumference).abs() < 1e-6);

        let pole_to_pole = haversine_distance(90.0, 0.0, -90.0, 0.0);
        assert!((pole_to_pole - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn path_length_of_short_paths_is_zero() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[(12.0, 34.0)]), 0.0);
    }

    #[test]
    fn path_length_sums_segments() {
        let points = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let expected = haversine_distance(0.0, 0.0, 0.0, 1.0)
            + haversine_distance(0.0, 1.0, 1.0, 1.0);
        assert!((path_length(&points) - expected).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_contains_center() {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(54.32, 10.13, 1.0);
        assert!(min_lat < 54.32 && 54.32 < max_lat);
        assert!(min_lon < 10.13 && 10.13 < max_lon);
    }
}
