use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    cancel_meeting, check_conflicts, create_meeting, day_conflict_rate, day_layout,
    list_meetings, slot_search, AppState,
};
use crate::handlers::test::{health_check, test_schedule_payloads};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Scheduling API routes are the core surface and always exposed
    let api_routes = Router::new()
        .route("/meetings", get(list_meetings).post(create_meeting))
        .route("/meetings/:meeting_id/cancel", post(cancel_meeting))
        .route("/schedule/:date/layout", get(day_layout))
        .route("/schedule/:date/conflict-rate", get(day_conflict_rate))
        .route("/conflicts/check", post(check_conflicts))
        .route("/slots/search", post(slot_search));
    router = router.merge(api_routes);

    // Sample payload endpoints are only mounted outside production
    if !is_production {
        let test_routes =
            Router::new().route("/test/payloads", get(test_schedule_payloads));
        router = router.merge(test_routes);

        info!("Test payload routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - test payload routes hidden");
    }

    router.with_state(app_state)
}
