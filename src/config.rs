//! Scheduler configuration.
//!
//! Every constant the engine relies on is carried here rather than hardcoded
//! in the algorithms, so the same engine can serve organizations with
//! different working windows or search policies.

use serde::Serialize;
use std::env;
use tracing::info;

/// One exploration window for candidate slot search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchWindow {
    pub label: String,
    /// Window start as minutes from midnight.
    pub start_minutes: i32,
    /// Window end as minutes from midnight; hypothetical slots must not
    /// cross this bound.
    pub end_minutes: i32,
    /// Score assigned to the first step of the window; later steps decay by
    /// one point per grid unit.
    pub base_score: u32,
}

/// Configuration for the scheduling and layout engine.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerConfig {
    /// Grid quantum in minutes; also the minimum meeting duration.
    pub grid_resolution_minutes: i32,
    /// Start of the working window, minutes from midnight.
    pub work_day_start_minutes: i32,
    /// End of the working window, minutes from midnight.
    pub work_day_end_minutes: i32,
    /// Recommended gap between consecutive meetings for the same mandatory
    /// attendee. Advisory only, never enforced.
    pub buffer_minutes: i32,
    /// Skip Saturdays and Sundays during slot search.
    pub skip_weekends: bool,
    /// Exploration windows for slot search, scanned in order.
    pub search_windows: Vec<SearchWindow>,
    /// Maximum number of candidate slots returned by a search.
    pub max_candidate_slots: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            grid_resolution_minutes: 15,
            work_day_start_minutes: 8 * 60,
            work_day_end_minutes: 20 * 60,
            buffer_minutes: 10,
            skip_weekends: true,
            search_windows: vec![
                SearchWindow {
                    label: "Morning".to_string(),
                    start_minutes: 9 * 60,
                    end_minutes: 12 * 60,
                    base_score: 85,
                },
                SearchWindow {
                    label: "Afternoon".to_string(),
                    start_minutes: 14 * 60,
                    end_minutes: 17 * 60,
                    base_score: 70,
                },
            ],
            max_candidate_slots: 5,
        }
    }
}

impl SchedulerConfig {
    /// Build a configuration from environment variables, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("SKIP_WEEKENDS") {
            config.skip_weekends = val.to_lowercase() == "true";
        }

        if let Some(buffer) = env::var("BUFFER_MINUTES")
            .ok()
            .and_then(|val| val.parse::<i32>().ok())
        {
            config.buffer_minutes = buffer;
        }

        if let Some(max) = env::var("MAX_CANDIDATE_SLOTS")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
        {
            config.max_candidate_slots = max;
        }

        info!(
            "Scheduler configured: working window {}-{} minutes, {}-minute grid, skip_weekends={}, max {} candidate slots",
            config.work_day_start_minutes,
            config.work_day_end_minutes,
            config.grid_resolution_minutes,
            config.skip_weekends,
            config.max_candidate_slots
        );

        config
    }

    /// Number of grid rows spanned by the working window, inclusive of the
    /// closing boundary row.
    pub fn grid_row_count(&self) -> i32 {
        (self.work_day_end_minutes - self.work_day_start_minutes) / self.grid_resolution_minutes
            + 1
    }
}
