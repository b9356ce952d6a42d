use serde::Serialize;
use uuid::Uuid;

use crate::engine::clock::SessionClock;
use crate::engine::filter::{FixFilter, FixVerdict, RejectReason};
use crate::engine::route::RouteAggregator;
use crate::engine::segment::SegmentAccumulator;
use crate::types::fix::Fix;
use crate::types::mode::MovementMode;
use crate::types::route::Route;
use crate::types::snapshot::{TrackerSnapshot, TrackingState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FixOutcome {
    /// Not used at all, the live position is unchanged.
    Dropped { reason: RejectReason },
    /// Live position moved; the track did not. `None` when not tracking.
    LocationOnly { reason: Option<RejectReason> },
    #[serde(rename_all = "camelCase")]
    Recorded { delta_meters: f64 },
}

/// The tracking engine. Every transition is driven by an explicit call with
/// the current wall-clock time; nothing here reads the clock itself.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    state: TrackingState,
    mode: MovementMode,
    user_location: Option<Fix>,
    filter: FixFilter,
    segment: SegmentAccumulator,
    route: RouteAggregator,
    clock: SessionClock,
}

impl Tracker {
    pub fn new(mode: MovementMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        self.state == TrackingState::Tracking
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn user_location(&self) -> Option<&Fix> {
        self.user_location.as_ref()
    }

    pub fn elapsed(&self, now_ms: i64) -> i64 {
        self.clock.elapsed(now_ms)
    }

    /// Begins a session from idle. Returns false if one is already running
    /// or paused.
    pub fn start(&mut self, now_ms: i64) -> bool {
        if self.state != TrackingState::Idle {
            return false;
        }

        let route = self.route.start(new_id(), now_ms);
        tracing::info!("Tracking started, route {}", route.id);
        self.segment.begin(new_id(), self.mode, now_ms);
        self.clock.resume(now_ms);
        self.state = TrackingState::Tracking;
        true
    }

    /// Pauses a running session, resumes a paused one, or starts from idle.
    pub fn toggle(&mut self, now_ms: i64) -> TrackingState {
        match self.state {
            TrackingState::Idle => {
                self.start(now_ms);
            }
            TrackingState::Tracking => {
                self.clock.pause(now_ms);
                self.state = TrackingState::Paused;
                tracing::info!("Tracking paused at {} ms elapsed", self.clock.elapsed(now_ms));
            }
            TrackingState::Paused => {
                self.clock.resume(now_ms);
                self.state = TrackingState::Tracking;
                if self.segment.mode() != Some(self.mode) {
                    self.split_segment(now_ms);
                }
                tracing::info!("Tracking resumed");
            }
        }
        self.state
    }

    /// Switches the movement mode. While tracking the open segment is closed
    /// and a new one begins; otherwise only the preference changes.
    pub fn on_mode_change(&mut self, mode: MovementMode, now_ms: i64) -> bool {
        if mode == self.mode {
            return false;
        }

        tracing::info!("Mode change {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        if self.is_tracking() {
            self.split_segment(now_ms);
        }
        true
    }

    pub fn on_fix(&mut self, fix: Fix) -> FixOutcome {
        let tracking = self.is_tracking();
        let last_point = if tracking { self.segment.last_point() } else { None };
        let verdict = self.filter.evaluate(&fix, last_point);

        let outcome = match verdict {
            FixVerdict::Drop(reason) => FixOutcome::Dropped { reason },
            FixVerdict::LiveOnly(reason) => {
                self.user_location = Some(fix);
                FixOutcome::LocationOnly {
                    reason: Some(reason),
                }
            }
            FixVerdict::Accept { .. } if !tracking => {
                self.user_location = Some(fix);
                FixOutcome::LocationOnly { reason: None }
            }
            FixVerdict::Accept { delta_meters } => {
                self.user_location = Some(fix.clone());
                if self.segment.push(fix, delta_meters) {
                    FixOutcome::Recorded { delta_meters }
                } else {
                    FixOutcome::LocationOnly { reason: None }
                }
            }
        };

        tracing::debug!("Fix outcome: {:?}", outcome);
        outcome
    }

    /// Failures from the fix source never change tracking state.
    pub fn report_fix_error(&self, message: &str) {
        tracing::warn!(
            "Fix source error while {:?}: {}",
            self.state,
            message
        );
    }

    /// Ends the session. Returns the finished route when it carries distance;
    /// route, segment and clock state are reset regardless.
    pub fn stop(&mut self, now_ms: i64) -> Option<Route> {
        if self.state == TrackingState::Idle {
            return None;
        }

        if let Some(segment) = self.segment.finalize(now_ms) {
            self.route.on_segment_finalized(segment);
        }
        let finished = self.route.finish(now_ms);

        self.segment.clear();
        self.route.clear();
        self.clock.reset();
        self.state = TrackingState::Idle;

        match &finished {
            Some(route) => tracing::info!(
                "Tracking stopped, route {} with {} segments, {:.1} m",
                route.id,
                route.segments.len(),
                route.total_distance_meters
            ),
            None => tracing::info!("Tracking stopped with no distance recorded"),
        }
        finished
    }

    pub fn snapshot(&self, now_ms: i64) -> TrackerSnapshot {
        let route = self.route.current();
        let active = self.segment.active();

        TrackerSnapshot {
            user_location: self.user_location.clone(),
            current_route: route.cloned(),
            active_segment: active.cloned(),
            mode: self.mode,
            live_distance: route.map_or(0.0, |r| r.total_distance_meters)
                + active.map_or(0.0, |s| s.distance_meters),
            live_steps: route.map_or(0, |r| r.total_steps) + active.map_or(0, |s| s.steps),
            live_calories: route.map_or(0.0, |r| r.total_calories)
                + active.map_or(0.0, |s| s.calories),
            elapsed_time_ms: self.clock.elapsed(now_ms),
            is_tracking: self.state == TrackingState::Tracking,
            is_paused: self.state == TrackingState::Paused,
        }
    }

    fn split_segment(&mut self, now_ms: i64) {
        if let Some(segment) = self.segment.finalize(now_ms) {
            tracing::debug!(
                "Segment {} closed: {} points, {:.1} m",
                segment.id,
                segment.points.len(),
                segment.distance_meters
            );
            self.route.on_segment_finalized(segment);
        }
        self.segment.begin(new_id(), self.mode, now_ms);
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
