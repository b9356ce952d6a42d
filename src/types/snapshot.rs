use serde::{Deserialize, Serialize};

use super::fix::Fix;
use super::mode::MovementMode;
use super::route::{Route, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingState {
    #[default]
    Idle,
    Tracking,
    Paused,
}

/// Read-only view of the engine handed to the presentation layer after every
/// transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub user_location: Option<Fix>,
    pub current_route: Option<Route>,
    pub active_segment: Option<Segment>,
    pub mode: MovementMode,
    pub live_distance: f64,
    pub live_steps: u64,
    pub live_calories: f64,
    pub elapsed_time_ms: i64,
    pub is_tracking: bool,
    pub is_paused: bool,
}
