pub mod clock;
pub mod filter;
pub mod metrics;
pub mod route;
pub mod sanitize;
pub mod segment;
pub mod tracker;

pub use tracker::{FixOutcome, Tracker};
