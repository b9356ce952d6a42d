//! Continuous GPS tracking engine: turns a noisy stream of position fixes
//! into segmented, multi-mode routes with distance, step and calorie
//! estimates, and serves it over a small HTTP API.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod format;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod types;
