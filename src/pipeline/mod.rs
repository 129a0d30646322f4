pub mod geo;
pub mod mapper;
pub mod motion;
pub mod parse;
pub mod process;

use rayon::prelude::*;

use crate::error::AppError;
use crate::types::metrics::ActivityMetrics;
use crate::types::track::Track;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub track: Track,
    pub metrics: ActivityMetrics,
}

/// Parses one uploaded file and derives its metrics.
pub fn analyze(filename: &str, bytes: &[u8], min_moving_speed_mps: f64) -> Result<Analysis, AppError> {
    let track = parse::parse_file(filename, bytes)?;
    let metrics = process::process(&track, min_moving_speed_mps)?;

    tracing::debug!(
        "Analyzed {} file {} ({} points, {:.0} m)",
        track.file_format.name(),
        filename,
        metrics.point_count,
        metrics.total_distance_m
    );

    Ok(Analysis { track, metrics })
}

/// Analyzes independent files in parallel; results keep the input order.
pub fn analyze_batch(
    files: Vec<(String, Vec<u8>)>,
    min_moving_speed_mps: f64,
) -> Vec<(String, Result<Analysis, AppError>)> {
    files
        .into_par_iter()
        .map(|(filename, bytes)| {
            let result = analyze(&filename, &bytes, min_moving_speed_mps);
            (filename, result)
        })
        .collect()
}
