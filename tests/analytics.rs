use chrono::{TimeZone, Utc};
use monotrack_rs::analytics::{calculate_analytics, top_routes};
use monotrack_rs::format::{format_distance, format_duration};
use monotrack_rs::types::route::Route;

fn saved_route(id: &str, start_ms: i64, duration_ms: i64, distance: f64, calories: f64) -> Route {
    let mut route = Route::new(id.to_string(), start_ms);
    route.end_time_ms = Some(start_ms + duration_ms);
    route.total_distance_meters = distance;
    route.total_calories = calories;
    route
}

fn ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .expect("valid date")
        .timestamp_millis()
}

#[test]
fn buckets_routes_by_day_week_and_month() {
    // Wednesday 2026-10-14, noon UTC. The week started Sunday 2026-10-11.
    let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).single().expect("now");

    let routes = vec![
        saved_route("today", ms(2026, 10, 14, 8), 1_800_000, 2_000.0, 100.0),
        saved_route("sunday", ms(2026, 10, 11, 9), 600_000, 1_000.0, 50.0),
        saved_route("last-saturday", ms(2026, 10, 10, 9), 600_000, 500.0, 25.0),
        saved_route("last-month", ms(2026, 9, 30, 9), 600_000, 400.0, 20.0),
        saved_route("last-year", ms(2025, 10, 14, 9), 600_000, 300.0, 15.0),
    ];

    let stats = calculate_analytics(&routes, &now);

    assert_eq!(stats.daily.count, 1);
    assert_eq!(stats.daily.distance_meters, 2_000.0);
    assert_eq!(stats.daily.duration_ms, 1_800_000);

    assert_eq!(stats.weekly.count, 2);
    assert_eq!(stats.weekly.distance_meters, 3_000.0);
    assert_eq!(stats.weekly.calories, 150.0);

    assert_eq!(stats.monthly.count, 3);
    assert_eq!(stats.monthly.distance_meters, 3_500.0);
}

#[test]
fn routes_without_positive_duration_count_zero_time() {
    let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).single().expect("now");
    let mut route = saved_route("odd", ms(2026, 10, 14, 9), 0, 100.0, 5.0);
    route.end_time_ms = Some(route.start_time_ms - 1_000);

    let stats = calculate_analytics(&[route], &now);
    assert_eq!(stats.daily.count, 1);
    assert_eq!(stats.daily.duration_ms, 0);
}

#[test]
fn top_routes_are_longest_first() {
    let routes: Vec<Route> = [300.0, 1_200.0, 50.0, 800.0, 5_000.0, 10.0, 900.0]
        .iter()
        .enumerate()
        .map(|(i, d)| saved_route(&format!("r{i}"), 1_000, 1_000, *d, 0.0))
        .collect();

    let top = top_routes(&routes, 5);
    let distances: Vec<f64> = top.iter().map(|r| r.total_distance_meters).collect();
    assert_eq!(distances, vec![5_000.0, 1_200.0, 900.0, 800.0, 300.0]);
}

#[test]
fn formats_distance_and_duration() {
    assert_eq!(format_distance(0.0), "0 m");
    assert_eq!(format_distance(999.4), "999 m");
    assert_eq!(format_distance(1_000.0), "1.00 km");
    assert_eq!(format_distance(12_346.0), "12.35 km");

    assert_eq!(format_duration(0), "00:00");
    assert_eq!(format_duration(65_000), "01:05");
    assert_eq!(format_duration(3_600_000), "01:00:00");
    assert_eq!(format_duration(3_725_999), "01:02:05");
}
