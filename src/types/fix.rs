use serde::{Deserialize, Serialize};

use super::lenient;

/// One timestamped position report from the fix source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    #[serde(default = "nan", deserialize_with = "lenient::coordinate")]
    pub lat: f64,
    #[serde(default = "nan", deserialize_with = "lenient::coordinate")]
    pub lng: f64,
    #[serde(default, deserialize_with = "lenient::millis")]
    pub timestamp_ms: i64,
    #[serde(
        default,
        deserialize_with = "lenient::accuracy",
        skip_serializing_if = "Option::is_none"
    )]
    pub accuracy_meters: Option<f64>,
}

impl Fix {
    pub fn new(lat: f64, lng: f64, timestamp_ms: i64, accuracy_meters: Option<f64>) -> Self {
        Self {
            lat,
            lng,
            timestamp_ms,
            accuracy_meters,
        }
    }

    pub fn has_finite_coordinates(&self) -> bool {
        is_finite_coordinate(self.lat, self.lng)
    }
}

pub fn is_finite_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite()
}

pub(crate) fn nan() -> f64 {
    f64::NAN
}
