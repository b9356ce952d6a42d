use crate::engine::metrics;
use crate::types::fix::Fix;
use crate::types::mode::MovementMode;
use crate::types::route::Segment;

/// Owns the one in-progress segment.
#[derive(Debug, Clone, Default)]
pub struct SegmentAccumulator {
    active: Option<Segment>,
}

impl SegmentAccumulator {
    pub fn active(&self) -> Option<&Segment> {
        self.active.as_ref()
    }

    pub fn mode(&self) -> Option<MovementMode> {
        self.active.as_ref().map(|s| s.mode)
    }

    pub fn last_point(&self) -> Option<&Fix> {
        self.active.as_ref().and_then(|s| s.points.last())
    }

    /// Opens a fresh segment. A segment that is already open is kept.
    pub fn begin(&mut self, id: String, mode: MovementMode, now_ms: i64) -> &Segment {
        self.active
            .get_or_insert_with(|| Segment::new(id, mode, now_ms))
    }

    /// Appends an accepted fix. Steps and calories are derived from the
    /// cumulative distance rather than summed per delta.
    pub fn push(&mut self, fix: Fix, delta_meters: f64) -> bool {
        let Some(segment) = self.active.as_mut() else {
            return false;
        };

        let delta = if delta_meters.is_finite() && delta_meters > 0.0 {
            delta_meters
        } else {
            0.0
        };

        segment.points.push(fix);
        segment.distance_meters += delta;
        let derived = metrics::segment_metrics(segment.distance_meters, segment.mode);
        segment.steps = derived.steps;
        segment.calories = derived.calories;
        true
    }

    /// Closes the open segment. Returns it only if it carries at least one point.
    pub fn finalize(&mut self, now_ms: i64) -> Option<Segment> {
        let mut segment = self.active.take()?;
        if segment.points.is_empty() {
            tracing::debug!("Discarding empty segment {} ({})", segment.id, segment.mode.as_str());
            return None;
        }
        segment.end_time_ms = Some(now_ms);
        Some(segment)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}
