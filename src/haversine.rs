//! Great-circle distance between geocoordinates.
//!
//! All spatial selection and route statistics go through [`distance_meters`]
//! so that radius and top-K results are reproducible.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Distance between two (lat, lng) pairs in meters.
pub fn distance_between(from: (f64, f64), to: (f64, f64)) -> f64 {
    distance_meters(from.0, from.1, to.0, to.1)
}

/// True when both components are finite numbers.
pub fn is_finite_point(point: (f64, f64)) -> bool {
    point.0.is_finite() && point.1.is_finite()
}

/// Total length of a path visiting `points` in order, in meters.
pub fn path_length_meters(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_between(pair[0], pair[1]))
        .sum()
}
