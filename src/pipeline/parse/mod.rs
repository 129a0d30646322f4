mod fit;
mod gpx;

pub use fit::FitParser;
pub use gpx::GpxParser;

use crate::error::ParseError;
use crate::types::track::{FileFormat, Track};

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<Track, ParseError>;
}

pub fn parse(bytes: &[u8], format: FileFormat) -> Result<Track, ParseError> {
    match format {
        FileFormat::Gpx => GpxParser.parse(bytes),
        FileFormat::Fit => FitParser.parse(bytes),
    }
}

pub(crate) fn valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Picks the parser from the file extension.
pub fn parse_file(filename: &str, bytes: &[u8]) -> Result<Track, ParseError> {
    let format = FileFormat::from_filename(filename)
        .ok_or_else(|| ParseError::UnsupportedFormat(filename.to_string()))?;
    parse(bytes, format)
}
