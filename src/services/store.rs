use chrono::{NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::models::meeting::{Category, Meeting, MeetingStatus};

const ATTENDEE_SEPARATOR: char = ';';

// Row shape stored in the CSV
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeetingRecord {
    pub id: String,
    pub title: String,
    pub date: String,       // ISO format
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM
    pub category: String,
    pub mandatory_attendees: String, // ';'-joined
    pub all_attendees: String,       // ';'-joined
    pub status: String,              // "confirmed" or "tentative"
    pub created_at: String,          // ISO format
    pub cancelled_at: String,        // ISO format (empty if active)
}

// CSV-backed store for meetings. The engine itself never touches this; it
// only sees the meeting pools handlers load from here.
pub struct MeetingStore {
    csv_path: String,
    file_mutex: Mutex<()>,
}

impl MeetingStore {
    pub fn new(csv_path: &str) -> Self {
        // Create the CSV file if it doesn't exist with proper headers
        if !Path::new(csv_path).exists() {
            info!("Creating new meetings database file at {}", csv_path);

            let file = File::create(csv_path).unwrap_or_else(|e| {
                error!("Failed to create database file: {}", e);
                panic!("Failed to create database file: {}", e)
            });

            let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

            if let Err(e) = writer.write_record([
                "id",
                "title",
                "date",
                "start_time",
                "end_time",
                "category",
                "mandatory_attendees",
                "all_attendees",
                "status",
                "created_at",
                "cancelled_at",
            ]) {
                error!("Failed to write headers: {}", e);
                panic!("Failed to write headers: {}", e);
            }

            if let Err(e) = writer.flush() {
                error!("Failed to flush headers: {}", e);
                panic!("Failed to flush headers: {}", e);
            }
        }

        Self {
            csv_path: csv_path.to_string(),
            file_mutex: Mutex::new(()),
        }
    }

    /// Store a new meeting, assigning it the next free id. The caller is
    /// expected to have validated times and normalized attendee sets.
    pub fn insert_meeting(&self, mut meeting: Meeting) -> Result<Meeting, String> {
        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        let next_id = self
            .read_all_records()?
            .iter()
            .filter_map(|record| record.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        meeting.id = next_id;

        let record = meeting_to_record(&meeting);

        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| format!("Failed to open database file: {}", e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer
            .serialize(&record)
            .map_err(|e| format!("Failed to serialize record: {}", e))?;

        writer
            .flush()
            .map_err(|e| format!("Failed to flush writer: {}", e))?;

        info!(
            "Stored meeting {} ({}) on {} {}-{}",
            meeting.id, meeting.title, meeting.date, meeting.start_time, meeting.end_time
        );

        Ok(meeting)
    }

    /// All non-cancelled meetings on one date.
    pub fn meetings_for_date(&self, date: NaiveDate) -> Result<Vec<Meeting>, String> {
        let date_str = date.to_string();
        let mut meetings = Vec::new();
        for record in self.read_all_records()? {
            if record.cancelled_at.is_empty() && record.date == date_str {
                meetings.push(record_to_meeting(&record)?);
            }
        }
        Ok(meetings)
    }

    /// All non-cancelled meetings within an inclusive date range.
    pub fn meetings_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Meeting>, String> {
        let mut meetings = Vec::new();
        for record in self.read_all_records()? {
            if !record.cancelled_at.is_empty() {
                continue;
            }
            let date: NaiveDate = record
                .date
                .parse()
                .map_err(|e| format!("Invalid date {:?} in record {}: {}", record.date, record.id, e))?;
            if date >= start && date <= end {
                meetings.push(record_to_meeting(&record)?);
            }
        }
        Ok(meetings)
    }

    /// Mark a meeting cancelled. Returns the cancelled meeting, or None when
    /// no active meeting has that id.
    pub fn cancel_meeting(&self, id: u64) -> Result<Option<Meeting>, String> {
        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        let mut records = self.read_all_records()?;
        let id_str = id.to_string();
        let mut cancelled = None;

        for record in records.iter_mut() {
            if record.id == id_str && record.cancelled_at.is_empty() {
                record.cancelled_at = Utc::now().to_rfc3339();
                cancelled = Some(record_to_meeting(record)?);
                break;
            }
        }

        if cancelled.is_none() {
            warn!("No active meeting found with id {}", id);
            return Ok(None);
        }

        self.rewrite_all_records(&records)?;
        info!("Cancelled meeting {}", id);
        Ok(cancelled)
    }

    // Read every row in the file; a missing file reads as empty
    fn read_all_records(&self) -> Result<Vec<MeetingRecord>, String> {
        let file = match File::open(&self.csv_path) {
            Ok(file) => file,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Ok(Vec::new());
                }
                return Err(format!("Failed to open database file: {}", e));
            }
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut records = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| format!("Failed to read record: {}", e))?;
            records.push(string_record_to_meeting_record(&record)?);
        }

        Ok(records)
    }

    // Replace the whole file; used for cancellation updates
    fn rewrite_all_records(&self, records: &[MeetingRecord]) -> Result<(), String> {
        let file = File::create(&self.csv_path)
            .map_err(|e| format!("Failed to rewrite database file: {}", e))?;

        let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

        for record in records {
            writer
                .serialize(record)
                .map_err(|e| format!("Failed to serialize record: {}", e))?;
        }

        writer
            .flush()
            .map_err(|e| format!("Failed to flush writer: {}", e))
    }
}

// Convert StringRecord to MeetingRecord
fn string_record_to_meeting_record(record: &StringRecord) -> Result<MeetingRecord, String> {
    if record.len() < 11 {
        return Err(format!(
            "Invalid record length: {}. Expected at least 11 fields.",
            record.len()
        ));
    }

    let get_field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

    Ok(MeetingRecord {
        id: get_field(0),
        title: get_field(1),
        date: get_field(2),
        start_time: get_field(3),
        end_time: get_field(4),
        category: get_field(5),
        mandatory_attendees: get_field(6),
        all_attendees: get_field(7),
        status: get_field(8),
        created_at: get_field(9),
        cancelled_at: get_field(10),
    })
}

fn meeting_to_record(meeting: &Meeting) -> MeetingRecord {
    MeetingRecord {
        id: meeting.id.to_string(),
        title: meeting.title.clone(),
        date: meeting.date.to_string(),
        start_time: meeting.start_time.clone(),
        end_time: meeting.end_time.clone(),
        category: meeting.category.as_str().to_string(),
        mandatory_attendees: join_attendees(&meeting.mandatory_attendees),
        all_attendees: join_attendees(&meeting.all_attendees),
        status: meeting.status.as_str().to_string(),
        created_at: Utc::now().to_rfc3339(),
        cancelled_at: String::new(),
    }
}

fn record_to_meeting(record: &MeetingRecord) -> Result<Meeting, String> {
    Ok(Meeting {
        id: record
            .id
            .parse()
            .map_err(|e| format!("Invalid meeting id {:?}: {}", record.id, e))?,
        title: record.title.clone(),
        date: record
            .date
            .parse()
            .map_err(|e| format!("Invalid date {:?} in record {}: {}", record.date, record.id, e))?,
        start_time: record.start_time.clone(),
        end_time: record.end_time.clone(),
        category: Category::parse(&record.category)
            .ok_or_else(|| format!("Unknown category {:?} in record {}", record.category, record.id))?,
        mandatory_attendees: split_attendees(&record.mandatory_attendees),
        all_attendees: split_attendees(&record.all_attendees),
        status: MeetingStatus::parse(&record.status)
            .ok_or_else(|| format!("Unknown status {:?} in record {}", record.status, record.id))?,
    })
}

fn join_attendees(attendees: &HashSet<String>) -> String {
    let mut names: Vec<&str> = attendees.iter().map(String::as_str).collect();
    names.sort();
    names.join(&ATTENDEE_SEPARATOR.to_string())
}

fn split_attendees(joined: &str) -> HashSet<String> {
    joined
        .split(ATTENDEE_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// Create a singleton meeting store
pub fn create_meeting_store() -> Arc<MeetingStore> {
    // Default path with environment variable override
    let default_path = "/app/data/meetings.csv";
    let csv_path =
        std::env::var("MEETING_DATABASE_PATH").unwrap_or_else(|_| default_path.to_string());

    // Create the data directory if it doesn't exist and we're using the default path
    if csv_path == default_path {
        let dir = std::path::Path::new(default_path).parent().unwrap();
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("Failed to create data directory: {}", e);
            panic!("Failed to create data directory: {}", e);
        }
    }

    Arc::new(MeetingStore::new(&csv_path))
}
