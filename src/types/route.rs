use serde::{Deserialize, Serialize};

use super::fix::Fix;
use super::lenient;
use super::mode::MovementMode;

/// A contiguous sub-track recorded in a single movement mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::mode")]
    pub mode: MovementMode,
    #[serde(default, deserialize_with = "lenient::points")]
    pub points: Vec<Fix>,
    #[serde(default, deserialize_with = "lenient::millis")]
    pub start_time_ms: i64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub distance_meters: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub steps: u64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub calories: f64,
}

impl Segment {
    pub fn new(id: String, mode: MovementMode, start_time_ms: i64) -> Self {
        Self {
            id,
            mode,
            points: Vec::new(),
            start_time_ms,
            end_time_ms: None,
            distance_meters: 0.0,
            steps: 0,
            calories: 0.0,
        }
    }
}

/// The full recording of one tracking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::segments")]
    pub segments: Vec<Segment>,
    #[serde(default, deserialize_with = "lenient::millis")]
    pub start_time_ms: i64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_distance_meters: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_steps: u64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_calories: f64,
}

impl Route {
    pub fn new(id: String, start_time_ms: i64) -> Self {
        Self {
            id,
            segments: Vec::new(),
            start_time_ms,
            end_time_ms: None,
            total_distance_meters: 0.0,
            total_steps: 0,
            total_calories: 0.0,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        match self.end_time_ms {
            Some(end) if end > self.start_time_ms => end - self.start_time_ms,
            _ => 0,
        }
    }
}
