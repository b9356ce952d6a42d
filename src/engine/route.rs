use crate::types::route::{Route, Segment};

/// Owns the in-progress route and its finalized segments.
#[derive(Debug, Clone, Default)]
pub struct RouteAggregator {
    route: Option<Route>,
}

impl RouteAggregator {
    pub fn current(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Creates the session's route if there is none yet.
    pub fn start(&mut self, id: String, now_ms: i64) -> &Route {
        self.route.get_or_insert_with(|| Route::new(id, now_ms))
    }

    pub fn on_segment_finalized(&mut self, segment: Segment) {
        let Some(route) = self.route.as_mut() else {
            tracing::warn!("Finalized segment {} arrived without a route", segment.id);
            return;
        };

        route.total_distance_meters += segment.distance_meters;
        route.total_steps += segment.steps;
        route.total_calories += segment.calories;
        route.segments.push(segment);
    }

    /// Closes the route. Returns it only when it recorded some distance;
    /// the aggregator is empty afterwards either way.
    pub fn finish(&mut self, now_ms: i64) -> Option<Route> {
        let mut route = self.route.take()?;
        if route.start_time_ms <= 0 {
            route.start_time_ms = now_ms;
        }
        route.end_time_ms = Some(now_ms);

        if route.total_distance_meters > 0.0 {
            Some(route)
        } else {
            tracing::info!("Discarding route {} with no recorded distance", route.id);
            None
        }
    }

    pub fn clear(&mut self) {
        self.route = None;
    }
}
