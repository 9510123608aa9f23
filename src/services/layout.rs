//! Grid layout engine.
//!
//! Transforms one day's meetings into positioned records on the fixed
//! 15-minute grid. The algorithm works in grid units; the caller maps units
//! onto pixels through [`GridGeometry`]. The whole pass is a pure function
//! of its inputs, so laying out the same day twice yields identical output.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::models::meeting::{DayLayout, LayoutWarning, Meeting, PositionedMeeting};
use crate::services::time::{duration_minutes, minutes_to_time, overlaps, time_to_minutes};

/// Vertical mapping supplied by the caller: how tall one grid unit is and
/// how far the grid starts below the top of the day column.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    pub unit_height: f32,
    pub header_offset: f32,
}

// Union-find over day meetings. Overlap clustering must be transitive: two
// meetings belong together whenever a chain of pairwise overlaps connects
// them, which a naive compare-against-first loop gets wrong.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            // Path halving
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}

struct DayEntry<'a> {
    meeting: &'a Meeting,
    start_minutes: i32,
    duration: i32,
}

/// Lay out all meetings on `date` from the supplied pool.
///
/// Meetings outside the working window are still positioned (coordinates may
/// be negative or exceed the grid) and reported in `warnings`; clipping is a
/// presentation concern. Fails only on malformed time strings, in which case
/// no partial layout is produced.
pub fn layout_day(
    meetings: &[Meeting],
    date: NaiveDate,
    geometry: &GridGeometry,
    config: &SchedulerConfig,
) -> Result<DayLayout, ScheduleError> {
    let resolution = config.grid_resolution_minutes as f32;

    // Filter to the requested date, preserving input order for the output
    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    for meeting in meetings.iter().filter(|m| m.date == date) {
        let start_minutes = time_to_minutes(&meeting.start_time)?;
        let end_minutes = time_to_minutes(&meeting.end_time)?;
        let duration = duration_minutes(&meeting.start_time, &meeting.end_time)?;

        if start_minutes < config.work_day_start_minutes
            || end_minutes > config.work_day_end_minutes
        {
            warnings.push(LayoutWarning {
                meeting_id: meeting.id,
                message: format!(
                    "Meeting {} ({}-{}) extends outside the {}-{} grid",
                    meeting.id,
                    meeting.start_time,
                    meeting.end_time,
                    minutes_to_time(config.work_day_start_minutes)?,
                    minutes_to_time(config.work_day_end_minutes)?,
                ),
            });
        }

        entries.push(DayEntry {
            meeting,
            start_minutes,
            duration,
        });
    }

    debug!(
        "Laying out {} meetings for {} ({} outside grid bounds)",
        entries.len(),
        date,
        warnings.len()
    );

    // Cluster order: top ascending, then id for determinism
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&i| (entries[i].start_minutes, entries[i].meeting.id));

    // Connect every directly overlapping pair; transitive chains fall out of
    // the union-find structure
    let mut clusters = DisjointSet::new(order.len());
    for i in 0..order.len() {
        for j in (i + 1)..order.len() {
            let a = &entries[order[i]];
            let b = &entries[order[j]];
            if overlaps(
                a.start_minutes,
                a.start_minutes + a.duration,
                b.start_minutes,
                b.start_minutes + b.duration,
            ) {
                clusters.union(i, j);
            }
        }
    }

    // Group sorted positions by cluster root; iteration in sorted order keeps
    // each member list ordered by (top, id)
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for sorted_pos in 0..order.len() {
        let root = clusters.find(sorted_pos);
        members.entry(root).or_default().push(sorted_pos);
    }

    // Fractional column assignment within each cluster
    let mut columns: HashMap<u64, (f32, f32)> = HashMap::new();
    for cluster in members.values() {
        let width = 100.0 / cluster.len() as f32;
        for (index, &sorted_pos) in cluster.iter().enumerate() {
            let id = entries[order[sorted_pos]].meeting.id;
            columns.insert(id, (width, index as f32 * width));
        }
    }

    // Emit in input order, augmented with layout fields
    let positioned = entries
        .iter()
        .map(|entry| {
            let slot_index =
                (entry.start_minutes - config.work_day_start_minutes) as f32 / resolution;
            let (width, left) = columns[&entry.meeting.id];
            PositionedMeeting {
                meeting: entry.meeting.clone(),
                top: slot_index * geometry.unit_height + geometry.header_offset,
                height: entry.duration as f32 / resolution * geometry.unit_height,
                width,
                left,
            }
        })
        .collect();

    Ok(DayLayout {
        date,
        meetings: positioned,
        warnings,
    })
}
