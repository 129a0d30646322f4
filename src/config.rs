#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    /// Samples faster than this (m/s) count as moving.
    pub min_moving_speed_mps: f64,
    pub max_batch_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            max_file_size: 25 * 1024 * 1024,
            min_moving_speed_mps: 0.0,
            max_batch_files: 16,
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

        let max_file_size_mb: usize = std::env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(25);

        let min_moving_speed_mps = std::env::var("MIN_MOVING_SPEED_MPS")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(defaults.min_moving_speed_mps);

        let max_batch_files = std::env::var("MAX_BATCH_FILES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_batch_files);

        Self {
            port,
            max_file_size: max_file_size_mb * 1024 * 1024,
            min_moving_speed_mps,
            max_batch_files,
        }
    }
}
