//! Candidate slot search.
//!
//! A heuristic, explainable shortlist of open time slots, not an optimal
//! solver. The search is conservative: any time overlap with an existing
//! meeting disqualifies a slot regardless of attendee mandatory status,
//! because the point is provably free time, not merely conflict-free time.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::models::meeting::{CandidateSlot, Meeting};
use crate::services::time::{minutes_to_time, overlaps, time_to_minutes};

/// Parameters for one slot search.
#[derive(Debug, Clone)]
pub struct SlotQuery {
    pub duration_minutes: i32,
    /// Attendees treated as mandatory for the proposed meeting. The
    /// conservative overlap policy means any free slot is free for everyone,
    /// so these only inform the reported reason.
    pub required_attendees: HashSet<String>,
    /// Inclusive date range bounds. An inverted range yields no candidates.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Search the date range for open slots of the requested duration, ranked by
/// score. Returns at most `config.max_candidate_slots` candidates, best
/// first; ties break toward the earliest date and time.
pub fn search_slots(
    query: &SlotQuery,
    pool: &[Meeting],
    config: &SchedulerConfig,
) -> Result<Vec<CandidateSlot>, ScheduleError> {
    if query.duration_minutes <= 0 {
        return Err(ScheduleError::NonPositiveDuration);
    }
    if query.duration_minutes < config.grid_resolution_minutes {
        return Err(ScheduleError::DurationTooShort {
            actual: query.duration_minutes,
            minimum: config.grid_resolution_minutes,
        });
    }

    let step = config.grid_resolution_minutes;
    let mut candidates = Vec::new();

    let mut date = query.start_date;
    while date <= query.end_date {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        if config.skip_weekends && weekend {
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
            continue;
        }

        // Busy ranges for this date; malformed stored times fail the call
        let mut busy = Vec::new();
        for meeting in pool.iter().filter(|m| m.date == date) {
            busy.push((
                time_to_minutes(&meeting.start_time)?,
                time_to_minutes(&meeting.end_time)?,
            ));
        }

        for window in &config.search_windows {
            let mut start = window.start_minutes;
            let mut step_index: u32 = 0;
            // Hypothetical [start, start+duration) must not cross the
            // window's upper bound
            while start + query.duration_minutes <= window.end_minutes {
                let end = start + query.duration_minutes;
                let free = !busy
                    .iter()
                    .any(|&(busy_start, busy_end)| overlaps(start, end, busy_start, busy_end));

                if free {
                    let score = window.base_score.saturating_sub(step_index);
                    let reason = if query.required_attendees.is_empty() {
                        format!("{} slot with no overlapping meetings", window.label)
                    } else {
                        format!(
                            "{} slot with no overlapping meetings; all {} required attendees free",
                            window.label,
                            query.required_attendees.len()
                        )
                    };
                    candidates.push(CandidateSlot {
                        date,
                        start_time: minutes_to_time(start)?,
                        end_time: minutes_to_time(end)?,
                        score,
                        reason,
                    });
                }

                start += step;
                step_index += 1;
            }
        }

        debug!(
            "Date {}: {} busy range(s), {} candidate(s) so far",
            date,
            busy.len(),
            candidates.len()
        );

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    // Best score first; ties go to the earliest date and time
    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.date.cmp(&b.date))
            .then(a.start_time.cmp(&b.start_time))
    });
    candidates.truncate(config.max_candidate_slots);

    info!(
        "Slot search for {} minutes between {} and {} returned {} candidate(s)",
        query.duration_minutes,
        query.start_date,
        query.end_date,
        candidates.len()
    );

    Ok(candidates)
}
