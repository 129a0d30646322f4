use striv::error::ParseError;
use striv::pipeline::parse::{self, GpxParser, Parser};
use striv::types::track::FileFormat;

fn three_point_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>Morning Run</name><type>running</type>
    <trkseg>
      <trkpt lat="0.0" lon="0.0"><ele>100</ele><time>2026-01-01T12:00:00Z</time></trkpt>
      <trkpt lat="0.0" lon="0.01"><ele>150</ele><time>2026-01-01T12:01:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="0.0" lon="0.02"><ele>120</ele><time>2026-01-01T12:02:00Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#
}

#[test]
fn flattens_segments_in_order() {
    let track = GpxParser.parse(three_point_gpx().as_bytes()).expect("track");

    assert_eq!(track.file_format, FileFormat::Gpx);
    assert_eq!(track.name.as_deref(), Some("Morning Run"));
    assert_eq!(track.kind.as_deref(), Some("running"));
    assert_eq!(track.points.len(), 3);
    assert_eq!(track.points[2].lon, 0.02);
    assert_eq!(track.points[1].elevation, Some(150.0));
    assert!(track.points.iter().all(|p| p.time.is_some()));
}

#[test]
fn reparsing_same_bytes_yields_equal_tracks() {
    let bytes = three_point_gpx().as_bytes();
    let first = GpxParser.parse(bytes).expect("first");
    let second = GpxParser.parse(bytes).expect("second");
    assert_eq!(first, second);
}

#[test]
fn falls_back_to_route_points() {
    let gpx = r#"<gpx><rte><name>Loop</name>
        <rtept lat="45.0" lon="6.0"/>
        <rtept lat="45.1" lon="6.1"><ele>1200</ele></rtept>
    </rte></gpx>"#;

    let track = GpxParser.parse(gpx.as_bytes()).expect("track");
    assert_eq!(track.name.as_deref(), Some("Loop"));
    assert_eq!(track.points.len(), 2);
    assert_eq!(track.points[0].elevation, None);
    assert_eq!(track.points[1].elevation, Some(1200.0));
}

#[test]
fn prefers_track_points_over_route_points() {
    let gpx = r#"<gpx>
        <rte><rtept lat="10.0" lon="10.0"/><rtept lat="10.1" lon="10.1"/></rte>
        <trk><trkseg><trkpt lat="1.0" lon="2.0"/></trkseg></trk>
    </gpx>"#;

    let track = GpxParser.parse(gpx.as_bytes()).expect("track");
    assert_eq!(track.points.len(), 1);
    assert_eq!(track.points[0].lat, 1.0);
}

#[test]
fn matches_namespaced_elements_by_local_name() {
    let gpx = r#"<g:gpx xmlns:g="http://www.topografix.com/GPX/1/1">
        <g:trk><g:trkseg>
            <g:trkpt lat="48.85" lon="2.35"><g:time>2026-03-01T08:00:00Z</g:time></g:trkpt>
        </g:trkseg></g:trk>
    </g:gpx>"#;

    let track = GpxParser.parse(gpx.as_bytes()).expect("track");
    assert_eq!(track.points.len(), 1);
    assert!(track.points[0].time.is_some());
}

#[test]
fn skips_points_without_coordinates() {
    let gpx = r#"<gpx><trk><trkseg>
        <trkpt lon="2.0"><ele>5</ele></trkpt>
        <trkpt lat="abc" lon="2.0"/>
        <trkpt lat="95.0" lon="2.0"/>
        <trkpt lat="1.0" lon="2.0"><ele>not-a-number</ele><time>yesterday</time></trkpt>
    </trkseg></trk></gpx>"#;

    let track = GpxParser.parse(gpx.as_bytes()).expect("track");
    assert_eq!(track.points.len(), 1);
    assert_eq!(track.points[0].elevation, None);
    assert_eq!(track.points[0].time, None);
}

#[test]
fn no_usable_points_is_empty_track() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lon="2.0"/></trkseg></trk></gpx>"#;
    let err = GpxParser.parse(gpx.as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::EmptyTrack));

    let err = GpxParser.parse(b"<gpx version=\"1.1\"/>").unwrap_err();
    assert!(matches!(err, ParseError::EmptyTrack));
}

#[test]
fn rejects_documents_that_are_not_tracks() {
    for input in [
        "hello",
        "",
        "<kml><Placemark/></kml>",
        "<gpx><trk><trkseg><trkpt lat=\"1\" lon=\"2\">",
        "<gpx><trk></gpx>",
    ] {
        let err = GpxParser.parse(input.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ParseError::MalformedTrack(_)),
            "expected malformed for {:?}, got {:?}",
            input,
            err
        );
    }
}

#[test]
fn picks_parser_from_extension() {
    let track = parse::parse_file("RIDE.GPX", three_point_gpx().as_bytes()).expect("track");
    assert_eq!(track.points.len(), 3);

    let err = parse::parse_file("ride.txt", b"hello").unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedFormat(_)));

    let err = parse::parse_file("ride.fit", b"definitely not fit").unwrap_err();
    assert!(matches!(
        err,
        ParseError::MalformedTrack(_) | ParseError::EmptyTrack
    ));
}

#[test]
fn fit_records_become_track_points() {
    let bytes = include_bytes!("fixtures/ride.fit");
    let track = parse::parse_file("ride.fit", bytes).expect("track");

    assert_eq!(track.file_format, FileFormat::Fit);
    assert_eq!(track.kind.as_deref(), Some("cycling"));
    // the position-less record and the 120° latitude record are dropped
    assert_eq!(track.points.len(), 3);

    let first = &track.points[0];
    assert!((first.lat - 45.0).abs() < 1e-6);
    assert!((first.lon - 6.0).abs() < 1e-6);
    assert!((track.points[2].lat - 45.002).abs() < 1e-6);
    assert!(track
        .points
        .iter()
        .all(|p| (-90.0..=90.0).contains(&p.lat) && (-180.0..=180.0).contains(&p.lon)));

    let start: chrono::DateTime<chrono::Utc> = "2026-01-01T12:00:00Z".parse().expect("timestamp");
    assert_eq!(first.time, Some(start));
    assert_eq!(track.points[2].time, Some(start + chrono::Duration::seconds(20)));
}

#[test]
fn fit_without_positions_is_empty_track() {
    let bytes = include_bytes!("fixtures/no_position.fit");
    let err = parse::parse_file("indoor.fit", bytes).unwrap_err();
    assert!(matches!(err, ParseError::EmptyTrack));
}
