#![allow(dead_code)]

use monotrack_rs::engine::metrics::EARTH_RADIUS_M;
use monotrack_rs::types::fix::Fix;

/// A fix on the equator `meters` east of (0, 0). Along the equator the
/// haversine distance is exactly the arc length, so offsets add up.
pub fn fix_east(meters: f64, accuracy: f64) -> Fix {
    Fix::new(0.0, (meters / EARTH_RADIUS_M).to_degrees(), 1, Some(accuracy))
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
