use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use practice_tracker::{
    create_router,
    state::{AppState, UserStore},
    timer::{Clock, ManualClock},
};

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap(),
        ));
        let state = AppState::new(
            UserStore::in_memory(),
            Duration::hours(24),
            clock.clone(),
            0,
            "127.0.0.1".to_string(),
        );
        Self {
            router: create_router(Arc::new(state)),
            clock,
        }
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register a user owning Piano/Guitar and Scales/Repertoire, returning their token
    async fn user(&self) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/register",
                None,
                Some(json!({"username": "ana", "email": "ana@example.com", "password": "secret1"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _) = self
            .request(
                "PUT",
                "/api/user",
                Some(&token),
                Some(json!({
                    "instruments": ["Piano", "Guitar"],
                    "categories": ["Scales", "Repertoire"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        token
    }
}

#[tokio::test]
async fn register_login_and_logout() {
    let app = TestApp::new();
    let token = app.user().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "ANA@example.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ana");
    assert_eq!(body["user"]["instruments"], json!(["Piano", "Guitar"]));
    assert!(body["user"].get("passwordDigest").is_none());

    let (status, body) = app
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, _) = app.request("POST", "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request("GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/api/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing bearer token");

    let (status, _) = app.request("GET", "/api/timer", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.user().await;
    let (status, body) = app
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({"username": "ana2", "email": "ana@example.com", "password": "secret2"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn practice_sessions_are_validated_listed_and_deleted() {
    let app = TestApp::new();
    let token = app.user().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/user/practice",
            Some(&token),
            Some(json!({"instrument": "Violin", "category": "Scales", "duration": 60})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown instrument: Violin");

    for (date, instrument) in [
        ("2024-05-08T09:00:00Z", "Piano"),
        ("2024-05-09T09:00:00Z", "Guitar"),
    ] {
        let (status, _) = app
            .request(
                "POST",
                "/api/user/practice",
                Some(&token),
                Some(json!({
                    "instrument": instrument,
                    "category": "Scales",
                    "duration": 125,
                    "notes": "metronome at 80",
                    "date": date
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.request("GET", "/api/user/practice", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["instrument"], "Guitar");
    assert_eq!(listed[0]["durationFormatted"], "2:05");

    let (_, body) = app
        .request("GET", "/api/user/practice?instrument=Piano", Some(&token), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = app
        .request("GET", "/api/user/practice?date=2024-05-09", Some(&token), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let id = listed[0]["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .request("DELETE", &format!("/api/user/practice/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["practiceSessions"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .request("DELETE", &format!("/api/user/practice/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .request("DELETE", "/api/user/practice/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stopwatch_save_records_elapsed_time() {
    let app = TestApp::new();
    let token = app.user().await;

    let (status, _) = app
        .request(
            "POST",
            "/api/timer/save",
            Some(&token),
            Some(json!({"instrument": "Piano", "category": "Scales"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.request("POST", "/api/timer/start", Some(&token), None).await;
    assert_eq!(body["isRunning"], true);
    app.clock.advance(Duration::seconds(125));
    let (_, body) = app.request("GET", "/api/timer", Some(&token), None).await;
    assert_eq!(body["display"], "02:05");
    let (_, body) = app.request("POST", "/api/timer/stop", Some(&token), None).await;
    assert_eq!(body["isRunning"], false);
    assert_eq!(body["elapsedSeconds"], 125);

    let (status, body) = app
        .request(
            "POST",
            "/api/timer/save",
            Some(&token),
            Some(json!({"instrument": "Piano", "category": "Scales", "notes": "arpeggios"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let session = &body["practiceSessions"][0];
    assert_eq!(session["duration"], 125);
    assert_eq!(session["notes"], "arpeggios");
    assert_eq!(session["date"], json!(app.clock.now()));

    let (_, body) = app.request("GET", "/api/timer", Some(&token), None).await;
    assert_eq!(body["elapsedSeconds"], 0);
    assert_eq!(body["mode"], "stopwatch");
}

#[tokio::test]
async fn manual_entry_is_validated_and_saved() {
    let app = TestApp::new();
    let token = app.user().await;

    let (status, _) = app
        .request(
            "PUT",
            "/api/timer/manual",
            Some(&token),
            Some(json!({"minutes": 1, "seconds": 0})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.request("POST", "/api/timer/start", Some(&token), None).await;
    app.clock.advance(Duration::seconds(10));
    let (_, body) = app
        .request("PUT", "/api/timer/mode", Some(&token), Some(json!({"manual": true})))
        .await;
    assert_eq!(body["mode"], "manual");
    assert_eq!(body["isRunning"], false);
    assert_eq!(body["elapsedSeconds"], 0);

    let (status, body) = app
        .request(
            "PUT",
            "/api/timer/manual",
            Some(&token),
            Some(json!({"minutes": 2, "seconds": 75})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Seconds must be less than 60");

    let (_, body) = app
        .request(
            "PUT",
            "/api/timer/manual",
            Some(&token),
            Some(json!({"minutes": 2, "seconds": 30})),
        )
        .await;
    assert_eq!(body["elapsedSeconds"], 150);

    let (status, body) = app
        .request(
            "POST",
            "/api/timer/save",
            Some(&token),
            Some(json!({"instrument": "Guitar", "category": "Repertoire"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["practiceSessions"][0]["duration"], 150);
}

#[tokio::test]
async fn weekly_report_breaks_down_practice() {
    let app = TestApp::new();
    let token = app.user().await;

    for (instrument, category, duration, date) in [
        ("Piano", "Scales", 2700, "2024-05-09T08:00:00Z"),
        ("Guitar", "Repertoire", 900, "2024-05-06T08:00:00Z"),
        ("Piano", "Repertoire", 600, "2024-04-01T08:00:00Z"),
    ] {
        app.request(
            "POST",
            "/api/user/practice",
            Some(&token),
            Some(json!({
                "instrument": instrument,
                "category": category,
                "duration": duration,
                "date": date
            })),
        )
        .await;
    }

    let (status, report) = app
        .request("GET", "/api/reports?range=weekly", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["range"], "weekly");
    assert_eq!(report["totalSeconds"], 3600);
    assert_eq!(report["totalFormatted"], "1h");
    assert_eq!(report["byInstrument"][0]["label"], "Piano");
    assert_eq!(report["byInstrument"][0]["percentage"], 75.0);
    assert_eq!(report["byInstrument"][1]["percentage"], 25.0);
    assert_eq!(report["byDate"][0]["date"], "2024-05-06");
    assert_eq!(report["byDate"][0]["minutes"], 15);
    assert_eq!(report["byDate"][1]["date"], "2024-05-09");
    assert_eq!(report["allTimeSeconds"], 4200);
    assert_eq!(report["allTimeFormatted"], "1h 10m");

    let (_, yearly) = app
        .request("GET", "/api/reports?range=yearly", Some(&token), None)
        .await;
    assert_eq!(yearly["totalSeconds"], 4200);

    let (status, _) = app
        .request("GET", "/api/reports?range=hourly", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn huge_durations_do_not_break_reports() {
    let app = TestApp::new();
    let token = app.user().await;

    for _ in 0..2 {
        let (status, _) = app
            .request(
                "POST",
                "/api/user/practice",
                Some(&token),
                Some(json!({"instrument": "Piano", "category": "Scales", "duration": u64::MAX})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = app
        .request("GET", "/api/reports?range=daily", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totalSeconds"], u64::MAX);
    assert_eq!(report["byInstrument"][0]["percentage"], 100.0);
}

#[tokio::test]
async fn replaced_sessions_must_use_owned_labels() {
    let app = TestApp::new();
    let token = app.user().await;

    let (status, body) = app
        .request(
            "PUT",
            "/api/user",
            Some(&token),
            Some(json!({
                "practiceSessions": [{
                    "id": "6f1c2a4e-8d3b-4c5a-9e7f-0a1b2c3d4e5f",
                    "date": "2024-05-09T09:00:00Z",
                    "duration": 60,
                    "instrument": "Drums",
                    "category": "Nonsense"
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown instrument: Drums");

    let (status, _) = app
        .request(
            "POST",
            "/api/user/practice",
            Some(&token),
            Some(json!({"instrument": " Piano ", "category": "Scales", "duration": 60})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.request("GET", "/api/user", Some(&token), None).await;
    assert!(body["practiceSessions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleted_account_loses_access() {
    let app = TestApp::new();
    let token = app.user().await;

    let (status, body) = app.request("DELETE", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deleted");

    let (status, _) = app.request("GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["port"], 0);
    assert_eq!(body["host"], "127.0.0.1");
}
