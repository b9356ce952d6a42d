use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::types::route::Route;

pub const TOP_ROUTES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    pub distance_meters: f64,
    pub calories: f64,
    pub duration_ms: i64,
    pub count: u32,
}

impl AggregatedStats {
    fn add(&mut self, route: &Route) {
        self.distance_meters += route.total_distance_meters;
        self.calories += route.total_calories;
        self.duration_ms += route.duration_ms();
        self.count += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub daily: AggregatedStats,
    pub weekly: AggregatedStats,
    pub monthly: AggregatedStats,
}

/// Buckets saved routes by the calendar day, week (Sunday-based) and month
/// of `now`, in `now`'s timezone.
pub fn calculate_analytics<Tz: TimeZone>(routes: &[Route], now: &DateTime<Tz>) -> AnalyticsData {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut stats = AnalyticsData::default();

    for route in routes {
        let Some(started) = tz.timestamp_millis_opt(route.start_time_ms).single() else {
            continue;
        };
        let day = started.date_naive();

        if day == today {
            stats.daily.add(route);
        }
        if week_start(day) == week_start(today) {
            stats.weekly.add(route);
        }
        if day.year() == today.year() && day.month() == today.month() {
            stats.monthly.add(route);
        }
    }

    stats
}

/// The longest routes by total distance, longest first.
pub fn top_routes(routes: &[Route], limit: usize) -> Vec<Route> {
    let mut sorted = routes.to_vec();
    sorted.sort_by(|a, b| b.total_distance_meters.total_cmp(&a.total_distance_meters));
    sorted.truncate(limit);
    sorted
}

fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = day.weekday().num_days_from_sunday() as i64;
    day - chrono::Duration::days(offset)
}
