use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::meeting::{Category, MeetingStatus};

// Query parameters for listing meetings: either a single date or an
// inclusive start/end range
#[derive(Debug, Deserialize)]
pub struct MeetingListParams {
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

// Query parameters mapping grid units onto the caller's vertical axis
#[derive(Debug, Deserialize)]
pub struct LayoutParams {
    #[serde(default = "default_unit_height")]
    pub unit_height: f32,
    #[serde(default)]
    pub header_offset: f32,
}

pub fn default_unit_height() -> f32 {
    1.0
}

// Request body for creating a meeting or checking a hypothetical one
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingRequest {
    /// Existing meeting id when re-checking an edit; omit for new meetings.
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub category: Category,
    #[serde(default)]
    pub mandatory_attendees: Vec<String>,
    #[serde(default)]
    pub all_attendees: Vec<String>,
    #[serde(default = "default_status")]
    pub status: MeetingStatus,
}

pub fn default_status() -> MeetingStatus {
    MeetingStatus::Confirmed
}

// Request body for candidate slot search
#[derive(Debug, Deserialize)]
pub struct SlotSearchRequest {
    pub duration_minutes: i32,
    #[serde(default)]
    pub required_attendees: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
