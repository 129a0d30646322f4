use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::pipeline::parse::{valid_coordinates, Parser};
use crate::types::track::{FileFormat, Track, TrackPoint};

pub struct GpxParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointKind {
    Track,
    Route,
}

struct PendingPoint {
    kind: PointKind,
    /// `None` when the point lacked usable coordinates and will be dropped.
    point: Option<TrackPoint>,
}

#[derive(Default)]
struct GpxState {
    stack: Vec<String>,
    saw_root: bool,
    current: Option<PendingPoint>,
    track_points: Vec<TrackPoint>,
    route_points: Vec<TrackPoint>,
    track_name: Option<String>,
    track_kind: Option<String>,
    route_name: Option<String>,
    route_kind: Option<String>,
    skipped: usize,
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<Track, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut st = GpxState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e)?;
                    st.open(&name, &e)?;
                    st.stack.push(name);
                }
                Ok(Event::Empty(e)) => {
                    let name = local_name(&e)?;
                    st.open(&name, &e)?;
                    st.close(&name);
                }
                Ok(Event::End(e)) => {
                    let name = std::str::from_utf8(e.local_name().as_ref())
                        .map_err(|e| ParseError::MalformedTrack(e.to_string()))?
                        .to_string();
                    st.stack.pop();
                    st.close(&name);
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;
                    st.text(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| ParseError::MalformedTrack(e.to_string()))?
                        .to_string();
                    st.text(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::MalformedTrack(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = st.stack.last() {
            return Err(ParseError::MalformedTrack(format!(
                "unexpected end of document inside <{}>",
                open
            )));
        }
        if !st.saw_root {
            return Err(ParseError::MalformedTrack("missing <gpx> root element".to_string()));
        }
        if st.skipped > 0 {
            tracing::warn!("Skipped {} GPX points without usable coordinates", st.skipped);
        }

        let (points, name, kind) = if !st.track_points.is_empty() {
            (st.track_points, st.track_name, st.track_kind)
        } else {
            tracing::debug!("No <trkpt> found, falling back to <rtept>");
            (st.route_points, st.route_name, st.route_kind)
        };

        if points.is_empty() {
            return Err(ParseError::EmptyTrack);
        }

        Ok(Track {
            name,
            kind,
            points,
            file_format: FileFormat::Gpx,
        })
    }
}

impl GpxState {
    fn open(&mut self, name: &str, e: &BytesStart<'_>) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            if self.saw_root || name != "gpx" {
                return Err(ParseError::MalformedTrack(format!(
                    "unexpected root element <{}>, expected <gpx>",
                    name
                )));
            }
            self.saw_root = true;
            return Ok(());
        }

        let kind = match name {
            "trkpt" => PointKind::Track,
            "rtept" => PointKind::Route,
            _ => return Ok(()),
        };

        let point = read_coordinates(e)?;
        if point.is_none() {
            self.skipped += 1;
        }
        self.current = Some(PendingPoint { kind, point });
        Ok(())
    }

    fn close(&mut self, name: &str) {
        if name != "trkpt" && name != "rtept" {
            return;
        }
        if let Some(PendingPoint { kind, point: Some(point) }) = self.current.take() {
            match kind {
                PointKind::Track => self.track_points.push(point),
                PointKind::Route => self.route_points.push(point),
            }
        }
    }

    fn text(&mut self, text: &str) {
        let depth = self.stack.len();
        if depth < 2 {
            return;
        }
        let element = self.stack[depth - 1].as_str();
        let parent = self.stack[depth - 2].as_str();

        match (parent, element) {
            ("trkpt" | "rtept", "ele") => {
                if let Some(point) = self.current.as_mut().and_then(|p| p.point.as_mut()) {
                    point.elevation = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
                }
            }
            ("trkpt" | "rtept", "time") => {
                if let Some(point) = self.current.as_mut().and_then(|p| p.point.as_mut()) {
                    point.time = text.trim().parse::<DateTime<Utc>>().ok();
                }
            }
            ("trk", "name") if self.track_name.is_none() => self.track_name = Some(text.to_string()),
            ("trk", "type") if self.track_kind.is_none() => self.track_kind = Some(text.to_string()),
            ("rte", "name") if self.route_name.is_none() => self.route_name = Some(text.to_string()),
            ("rte", "type") if self.route_kind.is_none() => self.route_kind = Some(text.to_string()),
            _ => {}
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::MalformedTrack(e.to_string()))
}

fn read_coordinates(e: &BytesStart<'_>) -> Result<Option<TrackPoint>, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::MalformedTrack(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;

        match attr.key.local_name().as_ref() {
            b"lat" => lat = value.trim().parse::<f64>().ok(),
            b"lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) if valid_coordinates(lat, lon) => Ok(Some(TrackPoint::new(lat, lon))),
        _ => Ok(None),
    }
}
