use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Retail category that owns a meeting. Used for coloring and grouping in
/// the calling UI only; conflict logic never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Liquor,
    Tobacco,
    Pnc,
    Confectionary,
    Fashion,
    Destination,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Liquor => "liquor",
            Category::Tobacco => "tobacco",
            Category::Pnc => "pnc",
            Category::Confectionary => "confectionary",
            Category::Fashion => "fashion",
            Category::Destination => "destination",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "liquor" => Some(Category::Liquor),
            "tobacco" => Some(Category::Tobacco),
            "pnc" => Some(Category::Pnc),
            "confectionary" => Some(Category::Confectionary),
            "fashion" => Some(Category::Fashion),
            "destination" => Some(Category::Destination),
            _ => None,
        }
    }
}

/// Presentation-level meeting status. Does not affect conflict computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Confirmed,
    Tentative,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Confirmed => "confirmed",
            MeetingStatus::Tentative => "tentative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(MeetingStatus::Confirmed),
            "tentative" => Some(MeetingStatus::Tentative),
            _ => None,
        }
    }
}

/// A scheduled meeting as supplied by the storage collaborator.
///
/// Times are wall-clock `HH:MM` strings with `start_time < end_time`;
/// `mandatory_attendees` is always a subset of `all_attendees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub category: Category,
    pub mandatory_attendees: HashSet<String>,
    pub all_attendees: HashSet<String>,
    pub status: MeetingStatus,
}

/// A meeting augmented with layout coordinates for one layout pass.
///
/// `top` and `height` are in the caller's vertical unit; `width` and `left`
/// are percentages of the day column. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PositionedMeeting {
    pub meeting: Meeting,
    pub top: f32,
    pub height: f32,
    pub width: f32,
    pub left: f32,
}

/// Warning attached to a layout result when a meeting extends past the
/// declared grid range. Layout still proceeds with extrapolated coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutWarning {
    pub meeting_id: u64,
    pub message: String,
}

/// Result of laying out one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub meetings: Vec<PositionedMeeting>,
    pub warnings: Vec<LayoutWarning>,
}

/// Severity of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    /// Time overlap with at least one mutually mandatory attendee.
    High,
    /// Time overlap without any shared mandatory attendee.
    Medium,
}

/// A conflict between a candidate meeting and one existing meeting.
#[derive(Debug, Clone, Serialize)]
pub struct Conflict {
    pub meeting_id: u64,
    pub conflicts_with: u64,
    /// Sorted for deterministic output.
    pub shared_mandatory_attendees: Vec<String>,
    pub severity: ConflictSeverity,
}

/// Advisory warning for back-to-back meetings that squeeze a shared
/// mandatory attendee below the recommended buffer. Never blocks submission.
#[derive(Debug, Clone, Serialize)]
pub struct BufferWarning {
    pub meeting_id: u64,
    pub shared_attendees: Vec<String>,
    pub gap_minutes: i32,
}

/// A conflict-free open slot proposed by the search algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub score: u32,
    pub reason: String,
}

// Response structure for meeting creation
#[derive(Debug, Serialize)]
pub struct CreateMeetingResponse {
    pub meeting: Meeting,
    pub conflicts: Vec<Conflict>,
    pub buffer_warnings: Vec<BufferWarning>,
    pub message: String,
}

// Response structure for conflict checks
#[derive(Debug, Serialize)]
pub struct ConflictCheckResponse {
    pub conflicts: Vec<Conflict>,
    pub high_count: usize,
    pub medium_count: usize,
    pub message: String,
}

// Response structure for the per-day conflict rate metric
#[derive(Debug, Serialize)]
pub struct ConflictRateResponse {
    pub date: NaiveDate,
    pub meeting_count: usize,
    pub conflict_rate: f32,
}

// Response structure for slot search
#[derive(Debug, Serialize)]
pub struct SlotSearchResponse {
    pub candidates: Vec<CandidateSlot>,
    pub message: String,
}
