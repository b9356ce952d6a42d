use serde::{Deserialize, Serialize};

use super::fix::{is_finite_coordinate, nan};
use super::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    #[default]
    General,
    Shop,
    Park,
    Home,
    Work,
}

impl MarkerType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(MarkerType::General),
            "shop" => Some(MarkerType::Shop),
            "park" => Some(MarkerType::Park),
            "home" => Some(MarkerType::Home),
            "work" => Some(MarkerType::Work),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerType::General => "general",
            MarkerType::Shop => "shop",
            MarkerType::Park => "park",
            MarkerType::Home => "home",
            MarkerType::Work => "work",
        }
    }
}

/// A saved point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default = "nan", deserialize_with = "lenient::coordinate")]
    pub lat: f64,
    #[serde(default = "nan", deserialize_with = "lenient::coordinate")]
    pub lng: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(default, rename = "type", deserialize_with = "lenient::marker_type")]
    pub marker_type: MarkerType,
    #[serde(default, deserialize_with = "lenient::millis")]
    pub created_at_ms: i64,
}

impl Marker {
    pub fn has_finite_coordinates(&self) -> bool {
        is_finite_coordinate(self.lat, self.lng)
    }
}
