pub mod fixes;
pub mod health;
pub mod history;
pub mod markers;
pub mod session;
pub mod stats;
