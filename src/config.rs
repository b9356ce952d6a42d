use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub max_body_size: usize,
    pub tick_interval: Duration,
    pub command_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            max_body_size: 256 * 1024,
            tick_interval: Duration::from_secs(1),
            command_buffer: 64,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let max_body_size_kb: usize = std::env::var("MAX_BODY_SIZE_KB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256);

        let tick_interval_ms: u64 = std::env::var("TICK_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(1000);

        let command_buffer = std::env::var("COMMAND_BUFFER")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.command_buffer);

        Self {
            port,
            data_dir,
            max_body_size: max_body_size_kb * 1024,
            tick_interval: Duration::from_millis(tick_interval_ms),
            command_buffer,
        }
    }
}
