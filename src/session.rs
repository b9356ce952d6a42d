use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Interval, MissedTickBehavior};
use uuid::Uuid;

use crate::config::Config;
use crate::engine::sanitize::{load_sanitized, LoadedHistory};
use crate::engine::{FixOutcome, Tracker};
use crate::error::{SessionError, StoreError};
use crate::store::RouteStore;
use crate::types::fix::Fix;
use crate::types::marker::{Marker, MarkerType};
use crate::types::mode::MovementMode;
use crate::types::route::Route;
use crate::types::snapshot::{TrackerSnapshot, TrackingState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
    pub route: Option<Route>,
    pub saved: bool,
    pub snapshot: TrackerSnapshot,
}

#[derive(Debug, Clone)]
pub struct NewMarker {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub marker_type: MarkerType,
}

#[derive(Debug, Clone, Default)]
pub struct MarkerUpdate {
    pub label: Option<String>,
    pub marker_type: Option<MarkerType>,
}

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Snapshot(Reply<TrackerSnapshot>),
    Start(Reply<TrackerSnapshot>),
    Toggle(Reply<TrackerSnapshot>),
    SetMode(MovementMode, Reply<TrackerSnapshot>),
    Stop(Reply<StopReport>),
    Fixes(Vec<Fix>, Reply<(Vec<FixOutcome>, TrackerSnapshot)>),
    FixError(String),
    Routes(Reply<Vec<Route>>),
    ClearRoutes(Reply<Result<(), StoreError>>),
    Markers(Reply<Vec<Marker>>),
    AddMarker(NewMarker, Reply<Result<Marker, StoreError>>),
    UpdateMarker(String, MarkerUpdate, Reply<Result<Option<Marker>, StoreError>>),
    DeleteMarker(String, Reply<Result<bool, StoreError>>),
}

/// Cloneable handle to the tracking task. All engine and store mutations go
/// through its command channel, so they are applied one at a time.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<TrackerSnapshot>,
}

impl SessionHandle {
    /// Loads and sanitizes stored history, then spawns the tracking task on
    /// the current tokio runtime.
    pub fn spawn(store: Box<dyn RouteStore>, config: &Config) -> Self {
        let history = match load_sanitized(store.as_ref()) {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("Failed to load stored history, starting empty: {}", e);
                LoadedHistory::default()
            }
        };
        tracing::info!(
            "Loaded {} routes and {} markers",
            history.routes.len(),
            history.markers.len()
        );

        let (commands, rx) = mpsc::channel(config.command_buffer);
        let tracker = Tracker::new(MovementMode::default());
        let (snapshot_tx, snapshots) = watch::channel(tracker.snapshot(now_ms()));

        let task = SessionTask {
            tracker,
            store: Arc::from(store),
            routes: history.routes,
            markers: history.markers,
            snapshots: snapshot_tx,
            tick_interval: config.tick_interval,
        };
        tokio::spawn(task.run(rx));

        Self {
            commands,
            snapshots,
        }
    }

    /// Latest published snapshot, refreshed after every command and on each
    /// clock tick while tracking.
    pub fn latest(&self) -> TrackerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.clone()
    }

    pub async fn snapshot(&self) -> Result<TrackerSnapshot, SessionError> {
        self.request(Command::Snapshot).await
    }

    pub async fn start(&self) -> Result<TrackerSnapshot, SessionError> {
        self.request(Command::Start).await
    }

    pub async fn toggle(&self) -> Result<TrackerSnapshot, SessionError> {
        self.request(Command::Toggle).await
    }

    pub async fn set_mode(&self, mode: MovementMode) -> Result<TrackerSnapshot, SessionError> {
        self.request(|reply| Command::SetMode(mode, reply)).await
    }

    pub async fn stop(&self) -> Result<StopReport, SessionError> {
        self.request(Command::Stop).await
    }

    pub async fn push_fixes(
        &self,
        fixes: Vec<Fix>,
    ) -> Result<(Vec<FixOutcome>, TrackerSnapshot), SessionError> {
        self.request(|reply| Command::Fixes(fixes, reply)).await
    }

    pub async fn report_fix_error(&self, message: String) -> Result<(), SessionError> {
        self.commands
            .send(Command::FixError(message))
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn routes(&self) -> Result<Vec<Route>, SessionError> {
        self.request(Command::Routes).await
    }

    pub async fn clear_routes(&self) -> Result<Result<(), StoreError>, SessionError> {
        self.request(Command::ClearRoutes).await
    }

    pub async fn markers(&self) -> Result<Vec<Marker>, SessionError> {
        self.request(Command::Markers).await
    }

    pub async fn add_marker(
        &self,
        marker: NewMarker,
    ) -> Result<Result<Marker, StoreError>, SessionError> {
        self.request(|reply| Command::AddMarker(marker, reply)).await
    }

    pub async fn update_marker(
        &self,
        id: String,
        update: MarkerUpdate,
    ) -> Result<Result<Option<Marker>, StoreError>, SessionError> {
        self.request(|reply| Command::UpdateMarker(id, update, reply))
            .await
    }

    pub async fn delete_marker(&self, id: String) -> Result<Result<bool, StoreError>, SessionError> {
        self.request(|reply| Command::DeleteMarker(id, reply)).await
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }
}

enum Event {
    Command(Option<Command>),
    Tick,
}

struct SessionTask {
    tracker: Tracker,
    store: Arc<dyn RouteStore>,
    routes: Vec<Route>,
    markers: Vec<Marker>,
    snapshots: watch::Sender<TrackerSnapshot>,
    tick_interval: Duration,
}

impl SessionTask {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        let mut ticker: Option<Interval> = None;

        loop {
            let event = tokio::select! {
                command = rx.recv() => Event::Command(command),
                _ = next_tick(&mut ticker) => Event::Tick,
            };

            match event {
                Event::Command(Some(command)) => self.handle(command).await,
                Event::Command(None) => break,
                Event::Tick => {}
            }

            self.publish();

            // The tick only runs while tracking; pausing or stopping cancels it.
            match (self.tracker.state(), ticker.is_some()) {
                (TrackingState::Tracking, false) => {
                    let mut interval = tokio::time::interval(self.tick_interval);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    ticker = Some(interval);
                }
                (TrackingState::Idle | TrackingState::Paused, true) => ticker = None,
                _ => {}
            }
        }

        tracing::info!("Tracking session task stopped");
    }

    async fn handle(&mut self, command: Command) {
        let now = now_ms();
        match command {
            Command::Snapshot(reply) => {
                let _ = reply.send(self.tracker.snapshot(now));
            }
            Command::Start(reply) => {
                self.tracker.start(now);
                let _ = reply.send(self.tracker.snapshot(now));
            }
            Command::Toggle(reply) => {
                self.tracker.toggle(now);
                let _ = reply.send(self.tracker.snapshot(now));
            }
            Command::SetMode(mode, reply) => {
                self.tracker.on_mode_change(mode, now);
                let _ = reply.send(self.tracker.snapshot(now));
            }
            Command::Stop(reply) => {
                let report = self.stop(now).await;
                let _ = reply.send(report);
            }
            Command::Fixes(fixes, reply) => {
                let outcomes = fixes
                    .into_iter()
                    .map(|mut fix| {
                        if fix.timestamp_ms <= 0 {
                            fix.timestamp_ms = now;
                        }
                        self.tracker.on_fix(fix)
                    })
                    .collect();
                let _ = reply.send((outcomes, self.tracker.snapshot(now)));
            }
            Command::FixError(message) => self.tracker.report_fix_error(&message),
            Command::Routes(reply) => {
                let _ = reply.send(self.routes.clone());
            }
            Command::ClearRoutes(reply) => {
                let result = self.persist(|store| store.clear_routes()).await;
                if result.is_ok() {
                    tracing::info!("Cleared {} saved routes", self.routes.len());
                    self.routes.clear();
                }
                let _ = reply.send(result);
            }
            Command::Markers(reply) => {
                let _ = reply.send(self.markers.clone());
            }
            Command::AddMarker(new, reply) => {
                let marker = Marker {
                    id: Uuid::new_v4().to_string(),
                    lat: new.lat,
                    lng: new.lng,
                    label: new.label,
                    marker_type: new.marker_type,
                    created_at_ms: now,
                };
                let mut markers = self.markers.clone();
                markers.push(marker.clone());
                let result = self.commit_markers(markers).await.map(|()| marker);
                let _ = reply.send(result);
            }
            Command::UpdateMarker(id, update, reply) => {
                let mut markers = self.markers.clone();
                let result = match markers.iter_mut().find(|m| m.id == id) {
                    Some(marker) => {
                        if let Some(label) = update.label {
                            marker.label = label;
                        }
                        if let Some(marker_type) = update.marker_type {
                            marker.marker_type = marker_type;
                        }
                        let updated = marker.clone();
                        self.commit_markers(markers).await.map(|()| Some(updated))
                    }
                    None => Ok(None),
                };
                let _ = reply.send(result);
            }
            Command::DeleteMarker(id, reply) => {
                let mut markers = self.markers.clone();
                markers.retain(|m| m.id != id);
                let result = if markers.len() == self.markers.len() {
                    Ok(false)
                } else {
                    self.commit_markers(markers).await.map(|()| true)
                };
                let _ = reply.send(result);
            }
        }
    }

    /// Replaces the in-memory markers only once the store has accepted them.
    async fn commit_markers(&mut self, markers: Vec<Marker>) -> Result<(), StoreError> {
        let pending = markers.clone();
        self.persist(move |store| store.save_markers(&pending)).await?;
        self.markers = markers;
        Ok(())
    }

    /// Runs a store call on the blocking pool so file I/O does not stall the
    /// runtime. Calls still complete in command order.
    async fn persist<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RouteStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn stop(&mut self, now: i64) -> StopReport {
        let route = self.tracker.stop(now);

        let saved = match &route {
            Some(route) => {
                self.routes.push(route.clone());
                let routes = self.routes.clone();
                match self.persist(move |store| store.save_routes(&routes)).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!("Failed to persist route {}: {}", route.id, e);
                        false
                    }
                }
            }
            None => false,
        };

        StopReport {
            route,
            saved,
            snapshot: self.tracker.snapshot(now),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.tracker.snapshot(now_ms()));
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
