use axum::{body::to_bytes, http::Request, Router};
use serde_json::Value;
use striv::{config::Config, routes, state::AppState};
use tower::ServiceExt;

fn app() -> (Router, AppState) {
    let state = AppState::new(Config::default());
    (routes::router().with_state(state.clone()), state)
}

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>Equator Ride</name><type>cycling</type><trkseg>
    <trkpt lat="0.0" lon="0.0"><ele>10.0</ele><time>2026-01-01T12:00:00Z</time></trkpt>
    <trkpt lat="0.0" lon="0.01"><ele>15.0</ele><time>2026-01-01T12:01:00Z</time></trkpt>
    <trkpt lat="0.0" lon="0.02"><ele>12.0</ele><time>2026-01-01T12:02:00Z</time></trkpt>
  </trkseg></trk>
</gpx>"#
}

const BOUNDARY: &str = "X-BOUNDARY-TEST";

fn text_part(name: &str, value: &str) -> String {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

fn file_part(file_name: &str, file_body: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{file_body}\r\n"
    )
}

fn close() -> String {
    format!("--{BOUNDARY}--\r\n")
}

fn upload_request(body: String) -> Request<axum::body::Body> {
    Request::builder()
        .uri("/api/activities/upload")
        .method("POST")
        .header("x-user-id", "42")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json")
}

#[tokio::test]
async fn upload_gpx_creates_activity_with_derived_fields() {
    let (app, state) = app();
    let body = [
        text_part("sport", "cyclisme"),
        text_part("sport_detail", "route"),
        text_part("location", "Gulf of Guinea"),
        file_part("ride.gpx", sample_gpx()),
        close(),
    ]
    .concat();

    let response = app.oneshot(upload_request(body)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = json_body(response).await;

    let activity = &json["activity"];
    assert_eq!(activity["title"], "Equator Ride");
    assert_eq!(activity["sport"], "cyclisme");
    assert_eq!(activity["owner_id"], 42);
    assert_eq!(activity["date"], "2026-01-01");
    assert_eq!(activity["sport_detail"]["kind"], "bike_type");
    assert_eq!(activity["sport_detail"]["value"], "route");
    assert_eq!(activity["speed"]["unit"], "km/h");
    let distance = activity["distance_km"].as_f64().expect("distance");
    assert!((distance - 2.22).abs() < 0.01);

    let summary = &json["summary"];
    assert_eq!(summary["kind"], "cycling");
    assert_eq!(summary["total_duration_min"], 2.0);
    let avg = summary["average_speed_kmh"].as_f64().expect("avg");
    assert!((avg - 66.6).abs() < 0.5);

    assert_eq!(state.store.list_for_owner(42).len(), 1);
}

#[tokio::test]
async fn explicit_fields_override_track_values() {
    let (app, state) = app();
    let body = [
        text_part("title", "Commute"),
        text_part("sport", "course"),
        text_part("date", "2026-02-03"),
        text_part("distance_km", "3.0"),
        text_part("duration_hours", "0.25"),
        file_part("run.gpx", sample_gpx()),
        close(),
    ]
    .concat();

    let response = app.oneshot(upload_request(body)).await.expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let stored = state.store.list_for_owner(42);
    assert_eq!(stored[0].title, "Commute");
    assert_eq!(stored[0].distance_km, 3.0);
    assert_eq!(stored[0].duration_hours, Some(0.25));
    assert!((stored[0].speed.value - 12.0).abs() < 1e-9);
}

#[tokio::test]
async fn blank_date_defaults_to_track_start() {
    let (app, _) = app();
    let body = [
        text_part("sport", "cyclisme"),
        text_part("date", ""),
        text_part("distance_km", " "),
        file_part("ride.gpx", sample_gpx()),
        close(),
    ]
    .concat();

    let response = app.oneshot(upload_request(body)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["activity"]["date"], "2026-01-01");
}

#[tokio::test]
async fn upload_rejects_unparseable_date() {
    let (app, state) = app();
    let body = [
        text_part("sport", "cyclisme"),
        text_part("date", "01/02/2026"),
        file_part("ride.gpx", sample_gpx()),
        close(),
    ]
    .concat();

    let response = app.oneshot(upload_request(body)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn upload_fit_file_uses_session_sport_and_points() {
    let (app, state) = app();
    let boundary_head = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"ride.fit\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    );
    let mut body = text_part("sport", "cyclisme").into_bytes();
    body.extend_from_slice(text_part("title", "Alpine spin").as_bytes());
    body.extend_from_slice(boundary_head.as_bytes());
    body.extend_from_slice(include_bytes!("fixtures/ride.fit"));
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/activities/upload")
                .method("POST")
                .header("x-user-id", "42")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(axum::body::Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["summary"]["kind"], "cycling");
    assert_eq!(json["activity"]["date"], "2026-01-01");
    assert_eq!(state.store.list_for_owner(42).len(), 1);
}

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let (app, state) = app();
    let body = [text_part("sport", "course"), file_part("ride.txt", "hello"), close()].concat();

    let response = app.oneshot(upload_request(body)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn upload_rejects_malformed_track_and_unknown_sport() {
    let (app, state) = app();

    let body = [text_part("sport", "course"), file_part("ride.gpx", "<gpx><trk>"), close()].concat();
    let response = app.clone().oneshot(upload_request(body)).await.expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().expect("error").contains("Malformed track"));

    let body = [text_part("sport", "invalid"), file_part("ride.gpx", sample_gpx()), close()].concat();
    let response = app.oneshot(upload_request(body)).await.expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().expect("error").contains("invalid"));

    assert!(state.store.is_empty());
}

#[tokio::test]
async fn upload_requires_user_header() {
    let (app, _) = app();
    let body = [text_part("sport", "course"), file_part("ride.gpx", sample_gpx()), close()].concat();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/activities/upload")
                .method("POST")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(axum::body::Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}
