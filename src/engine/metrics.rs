use crate::types::fix::Fix;
use crate::types::mode::MovementMode;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const METERS_PER_STEP: f64 = 0.762;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentMetrics {
    pub steps: u64,
    pub calories: f64,
}

/// Great-circle distance between two fixes in meters (haversine, spherical Earth).
pub fn distance(a: &Fix, b: &Fix) -> f64 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng)
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Step and calorie estimate for a cumulative segment distance.
pub fn segment_metrics(distance_meters: f64, mode: MovementMode) -> SegmentMetrics {
    let config = mode.metrics();

    let steps = if config.tracks_steps && distance_meters > 0.0 {
        (distance_meters / METERS_PER_STEP).floor() as u64
    } else {
        0
    };

    SegmentMetrics {
        steps,
        calories: (distance_meters / 1000.0) * config.calories_per_km,
    }
}
