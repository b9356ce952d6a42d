use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    #[default]
    Walking,
    Bike,
    Bus,
    Vehicle,
}

/// Static per-mode estimation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeMetrics {
    pub tracks_steps: bool,
    pub calories_per_km: f64,
}

impl MovementMode {
    pub const ALL: [MovementMode; 4] = [
        MovementMode::Walking,
        MovementMode::Bike,
        MovementMode::Bus,
        MovementMode::Vehicle,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walking" | "walk" => Some(MovementMode::Walking),
            "bike" | "cycling" => Some(MovementMode::Bike),
            "bus" => Some(MovementMode::Bus),
            "vehicle" | "car" => Some(MovementMode::Vehicle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementMode::Walking => "walking",
            MovementMode::Bike => "bike",
            MovementMode::Bus => "bus",
            MovementMode::Vehicle => "vehicle",
        }
    }

    pub const fn metrics(self) -> ModeMetrics {
        match self {
            MovementMode::Walking => ModeMetrics {
                tracks_steps: true,
                calories_per_km: 50.0,
            },
            MovementMode::Bike => ModeMetrics {
                tracks_steps: false,
                calories_per_km: 25.0,
            },
            MovementMode::Bus | MovementMode::Vehicle => ModeMetrics {
                tracks_steps: false,
                calories_per_km: 0.0,
            },
        }
    }
}
