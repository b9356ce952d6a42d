use serde::Serialize;

use crate::engine::metrics;
use crate::types::fix::Fix;

/// Fixes less precise than this still move the live position but never
/// become part of segment geometry.
pub const MAX_TRACK_ACCURACY_M: f64 = 30.0;
/// Previous fix better than this followed by one worse than
/// `COLLAPSE_ACCURACY_M` is treated as spurious.
pub const TRUSTED_ACCURACY_M: f64 = 50.0;
pub const COLLAPSE_ACCURACY_M: f64 = 500.0;
/// Movement below this against the last segment point is jitter.
pub const MIN_MOVEMENT_M: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NonFiniteCoordinates,
    AccuracyCollapse,
    Imprecise,
    Jitter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixVerdict {
    /// Dropped entirely; the live position is left alone.
    Drop(RejectReason),
    /// Live position may update, segment geometry does not.
    LiveOnly(RejectReason),
    /// Fold into the active segment, adding `delta_meters`.
    Accept { delta_meters: f64 },
}

impl FixVerdict {
    pub fn updates_live_position(&self) -> bool {
        !matches!(self, FixVerdict::Drop(_))
    }
}

/// Gates incoming fixes. Holds the previous accepted fix, meaning the last
/// one that was allowed to update the live position.
#[derive(Debug, Clone, Default)]
pub struct FixFilter {
    last_accepted: Option<Fix>,
}

impl FixFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accepted(&self) -> Option<&Fix> {
        self.last_accepted.as_ref()
    }

    /// Classifies `fix` against the last segment point (if the active segment
    /// has any) and records it as the previous accepted fix when it passes
    /// the live-position gates.
    pub fn evaluate(&mut self, fix: &Fix, last_point: Option<&Fix>) -> FixVerdict {
        let verdict = classify(fix, self.last_accepted.as_ref(), last_point);
        if verdict.updates_live_position() {
            self.last_accepted = Some(fix.clone());
        }
        verdict
    }
}

pub fn classify(fix: &Fix, previous: Option<&Fix>, last_point: Option<&Fix>) -> FixVerdict {
    if !fix.has_finite_coordinates() {
        return FixVerdict::Drop(RejectReason::NonFiniteCoordinates);
    }

    let prev_accuracy = previous.and_then(|p| p.accuracy_meters);
    if let (Some(prev), Some(new)) = (prev_accuracy, fix.accuracy_meters) {
        if prev < TRUSTED_ACCURACY_M && new > COLLAPSE_ACCURACY_M {
            return FixVerdict::Drop(RejectReason::AccuracyCollapse);
        }
    }

    if fix.accuracy_meters.is_some_and(|a| a > MAX_TRACK_ACCURACY_M) {
        return FixVerdict::LiveOnly(RejectReason::Imprecise);
    }

    let Some(last) = last_point else {
        return FixVerdict::Accept { delta_meters: 0.0 };
    };

    let delta = if last.has_finite_coordinates() {
        metrics::distance(last, fix)
    } else {
        0.0
    };

    // NaN fails this comparison and falls through to be zeroed below.
    if delta < MIN_MOVEMENT_M {
        return FixVerdict::LiveOnly(RejectReason::Jitter);
    }

    FixVerdict::Accept {
        delta_meters: if delta.is_finite() { delta } else { 0.0 },
    }
}
