//! Conflict detection engine.
//!
//! A conflict exists between two meetings on the same date whose time ranges
//! overlap. Severity depends only on time overlap and the mutual mandatory
//! intersection, never on category, status or location: a mandatory attendee
//! on one side colliding with a merely-optional attendee on the other does
//! not block.

use std::collections::HashSet;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::models::meeting::{BufferWarning, Conflict, ConflictSeverity, Meeting};
use crate::services::time::{duration_minutes, minutes_to_time, overlaps, time_to_minutes};

fn shared_mandatory(a: &Meeting, b: &Meeting) -> Vec<String> {
    let mut shared: Vec<String> = a
        .mandatory_attendees
        .intersection(&b.mandatory_attendees)
        .cloned()
        .collect();
    shared.sort();
    shared
}

/// Detect all conflicts between `candidate` and the other meetings in the
/// pool. Non-overlapping meetings produce no entry; a clean pool yields an
/// empty list, never an error.
pub fn detect_conflicts(
    candidate: &Meeting,
    pool: &[Meeting],
) -> Result<Vec<Conflict>, ScheduleError> {
    let candidate_start = time_to_minutes(&candidate.start_time)?;
    let candidate_end = time_to_minutes(&candidate.end_time)?;

    let mut conflicts = Vec::new();
    for other in pool {
        if other.date != candidate.date || other.id == candidate.id {
            continue;
        }

        let other_start = time_to_minutes(&other.start_time)?;
        let other_end = time_to_minutes(&other.end_time)?;

        if !overlaps(candidate_start, candidate_end, other_start, other_end) {
            continue;
        }

        let shared = shared_mandatory(candidate, other);
        let severity = if shared.is_empty() {
            ConflictSeverity::Medium
        } else {
            ConflictSeverity::High
        };

        conflicts.push(Conflict {
            meeting_id: candidate.id,
            conflicts_with: other.id,
            shared_mandatory_attendees: shared,
            severity,
        });
    }

    debug!(
        "Meeting {} on {}: {} conflict(s) against a pool of {}",
        candidate.id,
        candidate.date,
        conflicts.len(),
        pool.len()
    );

    Ok(conflicts)
}

/// Fraction of meetings in the set that have at least one high-severity
/// conflict with another member. Reporting metric only, never blocking.
pub fn conflict_rate(meetings: &[Meeting]) -> Result<f32, ScheduleError> {
    if meetings.is_empty() {
        return Ok(0.0);
    }

    // Parse up front so malformed input fails the whole call
    let mut ranges = Vec::with_capacity(meetings.len());
    for meeting in meetings {
        ranges.push((
            time_to_minutes(&meeting.start_time)?,
            time_to_minutes(&meeting.end_time)?,
        ));
    }

    let mut in_high_conflict: HashSet<usize> = HashSet::new();
    for i in 0..meetings.len() {
        for j in (i + 1)..meetings.len() {
            if meetings[i].date != meetings[j].date || meetings[i].id == meetings[j].id {
                continue;
            }
            let (start_i, end_i) = ranges[i];
            let (start_j, end_j) = ranges[j];
            if overlaps(start_i, end_i, start_j, end_j)
                && !shared_mandatory(&meetings[i], &meetings[j]).is_empty()
            {
                in_high_conflict.insert(i);
                in_high_conflict.insert(j);
            }
        }
    }

    Ok(in_high_conflict.len() as f32 / meetings.len() as f32)
}

/// Working-hours and duration validation, applied before conflict detection
/// at meeting-creation time.
pub fn validate_meeting_times(
    start_time: &str,
    end_time: &str,
    config: &SchedulerConfig,
) -> Result<(), ScheduleError> {
    // Raises InvalidFormat or NonPositiveDuration first
    let duration = duration_minutes(start_time, end_time)?;

    let start_minutes = time_to_minutes(start_time)?;
    let end_minutes = time_to_minutes(end_time)?;

    if start_minutes < config.work_day_start_minutes
        || end_minutes > config.work_day_end_minutes
    {
        return Err(ScheduleError::OutsideWorkingHours {
            window_start: minutes_to_time(config.work_day_start_minutes)?,
            window_end: minutes_to_time(config.work_day_end_minutes)?,
        });
    }

    if duration < config.grid_resolution_minutes {
        return Err(ScheduleError::DurationTooShort {
            actual: duration,
            minimum: config.grid_resolution_minutes,
        });
    }

    Ok(())
}

/// Advisory check for the recommended gap between consecutive meetings that
/// share a mandatory attendee. Callers may surface these warnings but must
/// not block submission on them.
pub fn buffer_warnings(
    candidate: &Meeting,
    pool: &[Meeting],
    config: &SchedulerConfig,
) -> Result<Vec<BufferWarning>, ScheduleError> {
    let candidate_start = time_to_minutes(&candidate.start_time)?;
    let candidate_end = time_to_minutes(&candidate.end_time)?;

    let mut warnings = Vec::new();
    for other in pool {
        if other.date != candidate.date || other.id == candidate.id {
            continue;
        }

        let shared = shared_mandatory(candidate, other);
        if shared.is_empty() {
            continue;
        }

        let other_start = time_to_minutes(&other.start_time)?;
        let other_end = time_to_minutes(&other.end_time)?;

        // Overlapping pairs are conflicts, not buffer violations
        let gap = if other_start >= candidate_end {
            other_start - candidate_end
        } else if candidate_start >= other_end {
            candidate_start - other_end
        } else {
            continue;
        };

        if gap < config.buffer_minutes {
            warnings.push(BufferWarning {
                meeting_id: other.id,
                shared_attendees: shared,
                gap_minutes: gap,
            });
        }
    }

    Ok(warnings)
}
