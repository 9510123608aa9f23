#[cfg(test)]
mod api_tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    use crate::config::SchedulerConfig;
    use crate::handlers::api::AppState;
    use crate::routes::create_router;
    use crate::services::store::MeetingStore;

    // Helper function to set up a test server backed by a temporary store
    fn setup_test_server(is_production: bool) -> (TestServer, TempDir) {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("test_meetings.csv");
        let store = Arc::new(MeetingStore::new(csv_path.to_str().unwrap()));

        let app_state = Arc::new(AppState {
            store,
            config: SchedulerConfig::default(),
        });

        let router = create_router(app_state, is_production);
        let server = TestServer::new(router).unwrap();

        (server, dir)
    }

    fn meeting_body(start: &str, end: &str, mandatory: &[&str]) -> Value {
        json!({
            "title": "Fashion range briefing",
            "date": "2025-09-29",
            "start_time": start,
            "end_time": end,
            "category": "fashion",
            "mandatory_attendees": mandatory,
            "all_attendees": mandatory,
            "status": "confirmed"
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _dir) = setup_test_server(false);

        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[tokio::test]
    async fn test_create_meeting_reports_conflicts() {
        let (server, _dir) = setup_test_server(false);

        let first = server
            .post("/meetings")
            .json(&meeting_body("09:00", "10:00", &["Alice"]))
            .await;
        first.assert_status_ok();
        let first_body: Value = first.json();
        assert_eq!(first_body["meeting"]["id"], 1);
        assert_eq!(first_body["conflicts"].as_array().unwrap().len(), 0);

        // Overlapping meeting with the same mandatory attendee
        let second = server
            .post("/meetings")
            .json(&meeting_body("09:30", "10:30", &["Alice"]))
            .await;
        second.assert_status_ok();
        let second_body: Value = second.json();

        let conflicts = second_body["conflicts"].as_array().unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0]["conflicts_with"], 1);
        assert_eq!(conflicts[0]["severity"], "high");
        assert_eq!(conflicts[0]["shared_mandatory_attendees"][0], "Alice");
    }

    #[tokio::test]
    async fn test_create_meeting_outside_working_hours_is_rejected() {
        let (server, _dir) = setup_test_server(false);

        let response = server
            .post("/meetings")
            .json(&meeting_body("07:45", "09:00", &["Alice"]))
            .await;

        assert_eq!(response.status_code(), 422);
        let body: Value = response.json();
        assert_eq!(body["error"], "outside_working_hours");

        // Nothing was stored
        let listing = server
            .get("/meetings")
            .add_query_param("date", "2025-09-29")
            .await;
        listing.assert_status_ok();
        assert_eq!(listing.json::<Value>().as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_create_meeting_below_duration_floor_is_rejected() {
        let (server, _dir) = setup_test_server(false);

        let response = server
            .post("/meetings")
            .json(&meeting_body("09:00", "09:10", &["Alice"]))
            .await;

        assert_eq!(response.status_code(), 422);
        let body: Value = response.json();
        assert_eq!(body["error"], "duration_too_short");
    }

    #[tokio::test]
    async fn test_day_layout_splits_overlapping_meetings() {
        let (server, _dir) = setup_test_server(false);

        for (start, end) in [("09:00", "10:00"), ("09:30", "10:30")] {
            server
                .post("/meetings")
                .json(&meeting_body(start, end, &["Alice"]))
                .await
                .assert_status_ok();
        }

        let response = server.get("/schedule/2025-09-29/layout").await;
        response.assert_status_ok();
        let layout: Value = response.json();

        let meetings = layout["meetings"].as_array().unwrap();
        assert_eq!(meetings.len(), 2);
        for positioned in meetings {
            assert_eq!(positioned["width"], 50.0);
        }
        assert_eq!(layout["warnings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_conflict_check_does_not_persist() {
        let (server, _dir) = setup_test_server(false);

        server
            .post("/meetings")
            .json(&meeting_body("09:00", "10:00", &["Alice"]))
            .await
            .assert_status_ok();

        let response = server
            .post("/conflicts/check")
            .json(&meeting_body("09:30", "10:30", &["Alice"]))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["high_count"], 1);

        // The hypothetical meeting never entered the pool
        let listing = server
            .get("/meetings")
            .add_query_param("date", "2025-09-29")
            .await;
        assert_eq!(listing.json::<Value>().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_slot_search_avoids_booked_time() {
        let (server, _dir) = setup_test_server(false);

        server
            .post("/meetings")
            .json(&meeting_body("09:00", "12:00", &["Alice"]))
            .await
            .assert_status_ok();

        let response = server
            .post("/slots/search")
            .json(&json!({
                "duration_minutes": 60,
                "required_attendees": ["Alice"],
                "start_date": "2025-09-29",
                "end_date": "2025-09-29"
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();

        let candidates = body["candidates"].as_array().unwrap();
        assert!(!candidates.is_empty());
        for slot in candidates {
            // The whole morning is booked, so only afternoon slots survive
            assert!(slot["start_time"].as_str().unwrap() >= "14:00");
        }
    }

    #[tokio::test]
    async fn test_cancel_meeting_flow() {
        let (server, _dir) = setup_test_server(false);

        let created = server
            .post("/meetings")
            .json(&meeting_body("09:00", "10:00", &["Alice"]))
            .await;
        created.assert_status_ok();

        let cancel = server.post("/meetings/1/cancel").await;
        cancel.assert_status_ok();

        let listing = server
            .get("/meetings")
            .add_query_param("date", "2025-09-29")
            .await;
        assert_eq!(listing.json::<Value>().as_array().unwrap().len(), 0);

        // Cancelling again finds nothing active
        let repeat = server.post("/meetings/1/cancel").await;
        assert_eq!(repeat.status_code(), 404);
    }

    #[tokio::test]
    async fn test_conflict_rate_endpoint() {
        let (server, _dir) = setup_test_server(false);

        server
            .post("/meetings")
            .json(&meeting_body("09:00", "10:00", &["Alice"]))
            .await
            .assert_status_ok();
        server
            .post("/meetings")
            .json(&meeting_body("09:30", "10:30", &["Alice"]))
            .await
            .assert_status_ok();

        let response = server.get("/schedule/2025-09-29/conflict-rate").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meeting_count"], 2);
        assert_eq!(body["conflict_rate"], 1.0);
    }

    #[tokio::test]
    async fn test_payload_routes_hidden_in_production() {
        let (server, _dir) = setup_test_server(true);
        let response = server.get("/test/payloads").await;
        assert_eq!(response.status_code(), 404);

        let (dev_server, _dev_dir) = setup_test_server(false);
        let dev_response = dev_server.get("/test/payloads").await;
        dev_response.assert_status_ok();
    }
}
