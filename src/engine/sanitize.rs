use crate::error::StoreError;
use crate::store::RouteStore;
use crate::types::marker::Marker;
use crate::types::route::Route;

#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized<T> {
    pub items: Vec<T>,
    pub dropped: usize,
}

impl<T> Sanitized<T> {
    pub fn changed(&self) -> bool {
        self.dropped > 0
    }
}

/// Drops points without finite coordinates, then segments left without
/// points, then routes left without segments.
pub fn sanitize_routes(routes: Vec<Route>) -> Sanitized<Route> {
    let mut dropped = 0;

    let items = routes
        .into_iter()
        .filter_map(|mut route| {
            route.segments.retain_mut(|segment| {
                let before = segment.points.len();
                segment.points.retain(|p| p.has_finite_coordinates());
                dropped += before - segment.points.len();

                let keep = !segment.points.is_empty();
                if !keep {
                    dropped += 1;
                }
                keep
            });

            if route.segments.is_empty() {
                dropped += 1;
                tracing::warn!("Dropping stored route {} with no valid segments", route.id);
                None
            } else {
                Some(route)
            }
        })
        .collect();

    Sanitized { items, dropped }
}

pub fn sanitize_markers(markers: Vec<Marker>) -> Sanitized<Marker> {
    let before = markers.len();
    let items: Vec<Marker> = markers
        .into_iter()
        .filter(|m| m.has_finite_coordinates())
        .collect();

    Sanitized {
        dropped: before - items.len(),
        items,
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadedHistory {
    pub routes: Vec<Route>,
    pub markers: Vec<Marker>,
}

/// Loads and sanitizes persisted routes and markers, writing the cleaned
/// lists back whenever anything was dropped.
pub fn load_sanitized(store: &dyn RouteStore) -> Result<LoadedHistory, StoreError> {
    let routes = sanitize_routes(store.load_routes()?);
    if routes.changed() {
        tracing::warn!(
            "Sanitizer dropped {} malformed route entries, writing back {} routes",
            routes.dropped,
            routes.items.len()
        );
        store.save_routes(&routes.items)?;
    }

    let markers = sanitize_markers(store.load_markers()?);
    if markers.changed() {
        tracing::warn!(
            "Sanitizer dropped {} markers with invalid coordinates",
            markers.dropped
        );
        store.save_markers(&markers.items)?;
    }

    Ok(LoadedHistory {
        routes: routes.items,
        markers: markers.items,
    })
}
