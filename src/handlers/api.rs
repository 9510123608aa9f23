use axum::{
    extract::{Json as ExtractJson, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::models::common::{LayoutParams, MeetingListParams, MeetingRequest, SlotSearchRequest};
use crate::models::meeting::{
    ConflictCheckResponse, ConflictRateResponse, ConflictSeverity, CreateMeetingResponse,
    DayLayout, Meeting, SlotSearchResponse,
};
use crate::services::conflicts::{
    buffer_warnings, conflict_rate, detect_conflicts, validate_meeting_times,
};
use crate::services::layout::{layout_day, GridGeometry};
use crate::services::slots::{search_slots, SlotQuery};
use crate::services::store::MeetingStore;

// AppState struct containing shared resources
pub struct AppState {
    pub store: Arc<MeetingStore>,
    pub config: SchedulerConfig,
}

// Build an engine meeting from a request body, normalizing the attendee
// invariant (mandatory is always a subset of all)
fn meeting_from_request(request: &MeetingRequest) -> Meeting {
    let mandatory: HashSet<String> = request.mandatory_attendees.iter().cloned().collect();
    let mut all: HashSet<String> = request.all_attendees.iter().cloned().collect();
    all.extend(mandatory.iter().cloned());

    Meeting {
        id: request.id.unwrap_or(0),
        title: request.title.clone(),
        date: request.date,
        start_time: request.start_time.clone(),
        end_time: request.end_time.clone(),
        category: request.category,
        mandatory_attendees: mandatory,
        all_attendees: all,
        status: request.status,
    }
}

// List meetings endpoint: a single date or an inclusive range
pub async fn list_meetings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MeetingListParams>,
) -> Result<Json<Vec<Meeting>>, StatusCode> {
    let result = match (params.date, params.start, params.end) {
        (Some(date), _, _) => {
            info!("Received request to list meetings for {}", date);
            state.store.meetings_for_date(date)
        }
        (None, Some(start), Some(end)) => {
            info!("Received request to list meetings from {} to {}", start, end);
            state.store.meetings_in_range(start, end)
        }
        _ => {
            error!("Meeting list request needs either date or start+end");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match result {
        Ok(meetings) => {
            info!("Returning {} meetings", meetings.len());
            Ok(Json(meetings))
        }
        Err(err) => {
            error!("Failed to list meetings: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Create meeting endpoint: validate, store, then report conflicts and
// advisory buffer warnings. Conflicts never block creation.
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<MeetingRequest>,
) -> Result<Json<CreateMeetingResponse>, ScheduleError> {
    info!(
        "Received request to create meeting {:?} on {} {}-{}",
        request.title, request.date, request.start_time, request.end_time
    );

    validate_meeting_times(&request.start_time, &request.end_time, &state.config)?;

    let pool = state
        .store
        .meetings_for_date(request.date)
        .map_err(ScheduleError::Storage)?;

    let meeting = state
        .store
        .insert_meeting(meeting_from_request(&request))
        .map_err(ScheduleError::Storage)?;

    let conflicts = detect_conflicts(&meeting, &pool)?;
    let warnings = buffer_warnings(&meeting, &pool, &state.config)?;

    let message = if conflicts.is_empty() {
        format!("Meeting {} created with no conflicts", meeting.id)
    } else {
        format!(
            "Meeting {} created with {} conflict(s)",
            meeting.id,
            conflicts.len()
        )
    };
    info!("{}", message);

    Ok(Json(CreateMeetingResponse {
        meeting,
        conflicts,
        buffer_warnings: warnings,
        message,
    }))
}

// Cancel meeting endpoint
pub async fn cancel_meeting(
    State(state): State<Arc<AppState>>,
    Path(meeting_id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    info!("Received request to cancel meeting {}", meeting_id);

    match state.store.cancel_meeting(meeting_id) {
        Ok(Some(_)) => {
            info!("Successfully cancelled meeting {}", meeting_id);
            Ok(StatusCode::OK)
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            error!("Failed to cancel meeting: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Day layout endpoint: positioned meetings for one date
pub async fn day_layout(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
    Query(params): Query<LayoutParams>,
) -> Result<Json<DayLayout>, ScheduleError> {
    info!(
        "Received layout request for {} (unit_height={}, header_offset={})",
        date, params.unit_height, params.header_offset
    );

    let pool = state
        .store
        .meetings_for_date(date)
        .map_err(ScheduleError::Storage)?;

    let geometry = GridGeometry {
        unit_height: params.unit_height,
        header_offset: params.header_offset,
    };

    let layout = layout_day(&pool, date, &geometry, &state.config)?;
    info!(
        "Laid out {} meetings for {} ({} warnings)",
        layout.meetings.len(),
        date,
        layout.warnings.len()
    );

    Ok(Json(layout))
}

// Conflict rate endpoint: share of a day's meetings with a high conflict
pub async fn day_conflict_rate(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<ConflictRateResponse>, ScheduleError> {
    info!("Received conflict-rate request for {}", date);

    let pool = state
        .store
        .meetings_for_date(date)
        .map_err(ScheduleError::Storage)?;

    let rate = conflict_rate(&pool)?;

    Ok(Json(ConflictRateResponse {
        date,
        meeting_count: pool.len(),
        conflict_rate: rate,
    }))
}

// Conflict check endpoint for a hypothetical or edited meeting; nothing is
// persisted
pub async fn check_conflicts(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<MeetingRequest>,
) -> Result<Json<ConflictCheckResponse>, ScheduleError> {
    info!(
        "Received conflict check for {} {}-{}",
        request.date, request.start_time, request.end_time
    );

    let candidate = meeting_from_request(&request);
    let pool = state
        .store
        .meetings_for_date(candidate.date)
        .map_err(ScheduleError::Storage)?;

    let conflicts = detect_conflicts(&candidate, &pool)?;
    let high_count = conflicts
        .iter()
        .filter(|c| c.severity == ConflictSeverity::High)
        .count();
    let medium_count = conflicts.len() - high_count;

    let message = if conflicts.is_empty() {
        "No conflicts found".to_string()
    } else {
        format!(
            "Found {} conflict(s): {} high, {} medium",
            conflicts.len(),
            high_count,
            medium_count
        )
    };

    Ok(Json(ConflictCheckResponse {
        conflicts,
        high_count,
        medium_count,
        message,
    }))
}

// Slot search endpoint
pub async fn slot_search(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<SlotSearchRequest>,
) -> Result<Json<SlotSearchResponse>, ScheduleError> {
    info!(
        "Received slot search: {} minutes, {} attendees, {} to {}",
        request.duration_minutes,
        request.required_attendees.len(),
        request.start_date,
        request.end_date
    );

    let pool = state
        .store
        .meetings_in_range(request.start_date, request.end_date)
        .map_err(ScheduleError::Storage)?;

    let query = SlotQuery {
        duration_minutes: request.duration_minutes,
        required_attendees: request.required_attendees.iter().cloned().collect(),
        start_date: request.start_date,
        end_date: request.end_date,
    };

    let candidates = search_slots(&query, &pool, &state.config)?;

    let message = format!(
        "Found {} candidate slot(s) between {} and {}",
        candidates.len(),
        request.start_date,
        request.end_date
    );

    Ok(Json(SlotSearchResponse {
        candidates,
        message,
    }))
}
