use crate::error::ParseError;
use crate::pipeline::parse::{valid_coordinates, Parser};
use crate::types::track::{FileFormat, Track, TrackPoint};
use chrono::DateTime;
use fitparser::profile::MesgNum;

pub struct FitParser;

impl Parser for FitParser {
    fn parse(&self, bytes: &[u8]) -> Result<Track, ParseError> {
        let data = fitparser::from_bytes(bytes)
            .map_err(|e| ParseError::MalformedTrack(format!("Failed to decode FIT file: {}", e)))?;

        let mut points = Vec::new();
        let mut kind = None;
        let mut skipped = 0usize;

        for record in data {
            match record.kind() {
                MesgNum::Record => {}
                MesgNum::Session => {
                    for field in record.fields() {
                        if let ("sport", fitparser::Value::String(sport)) = (field.name(), field.value()) {
                            kind.get_or_insert_with(|| sport.clone());
                        }
                    }
                    continue;
                }
                _ => continue,
            }

            let mut lat = None;
            let mut lon = None;
            let mut elevation = None;
            let mut time = None;

            for field in record.fields() {
                match field.name() {
                    "position_lat" => {
                        if let fitparser::Value::SInt32(val) = field.value() {
                            lat = Some(semicircles_to_degrees(*val));
                        }
                    }
                    "position_long" => {
                        if let fitparser::Value::SInt32(val) = field.value() {
                            lon = Some(semicircles_to_degrees(*val));
                        }
                    }
                    "altitude" | "enhanced_altitude" => {
                        if let fitparser::Value::Float64(val) = field.value() {
                            elevation = Some(*val);
                        }
                    }
                    "timestamp" => {
                        if let fitparser::Value::Timestamp(val) = field.value() {
                            time = DateTime::from_timestamp(val.timestamp(), 0);
                        }
                    }
                    _ => {}
                }
            }

            match (lat, lon) {
                (Some(lat), Some(lon)) if valid_coordinates(lat, lon) => points.push(TrackPoint {
                    lat,
                    lon,
                    elevation,
                    time,
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} FIT records without a usable position", skipped);
        }

        if points.is_empty() {
            return Err(ParseError::EmptyTrack);
        }

        Ok(Track {
            name: None,
            kind,
            points,
            file_format: FileFormat::Fit,
        })
    }
}

fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}
