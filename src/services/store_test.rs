#[cfg(test)]
mod store_tests {
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use tempfile::tempdir;

    use crate::models::meeting::{Category, Meeting, MeetingStatus};
    use crate::services::store::MeetingStore;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn new_meeting(day: &str, start: &str, end: &str) -> Meeting {
        Meeting {
            id: 0,
            title: "Tobacco planogram review".to_string(),
            date: date(day),
            start_time: start.to_string(),
            end_time: end.to_string(),
            category: Category::Tobacco,
            mandatory_attendees: set(&["Alice", "Bob"]),
            all_attendees: set(&["Alice", "Bob", "Carol"]),
            status: MeetingStatus::Confirmed,
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("meetings.csv");
        let store = MeetingStore::new(csv_path.to_str().unwrap());

        let first = store
            .insert_meeting(new_meeting("2025-09-29", "09:00", "10:00"))
            .unwrap();
        let second = store
            .insert_meeting(new_meeting("2025-09-29", "10:00", "11:00"))
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_meetings_for_date_filters_and_round_trips() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("meetings.csv");
        let store = MeetingStore::new(csv_path.to_str().unwrap());

        store
            .insert_meeting(new_meeting("2025-09-29", "09:00", "10:00"))
            .unwrap();
        store
            .insert_meeting(new_meeting("2025-09-30", "11:00", "12:00"))
            .unwrap();

        let monday = store.meetings_for_date(date("2025-09-29")).unwrap();
        assert_eq!(monday.len(), 1);

        let loaded = &monday[0];
        assert_eq!(loaded.title, "Tobacco planogram review");
        assert_eq!(loaded.category, Category::Tobacco);
        assert_eq!(loaded.status, MeetingStatus::Confirmed);
        assert_eq!(loaded.mandatory_attendees, set(&["Alice", "Bob"]));
        assert_eq!(loaded.all_attendees, set(&["Alice", "Bob", "Carol"]));
    }

    #[test]
    fn test_meetings_in_range_is_inclusive() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("meetings.csv");
        let store = MeetingStore::new(csv_path.to_str().unwrap());

        for day in ["2025-09-29", "2025-09-30", "2025-10-01"] {
            store
                .insert_meeting(new_meeting(day, "09:00", "10:00"))
                .unwrap();
        }

        let range = store
            .meetings_in_range(date("2025-09-29"), date("2025-09-30"))
            .unwrap();
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_cancelled_meetings_leave_the_pool() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("meetings.csv");
        let store = MeetingStore::new(csv_path.to_str().unwrap());

        let meeting = store
            .insert_meeting(new_meeting("2025-09-29", "09:00", "10:00"))
            .unwrap();

        let cancelled = store.cancel_meeting(meeting.id).unwrap();
        assert!(cancelled.is_some());

        let remaining = store.meetings_for_date(date("2025-09-29")).unwrap();
        assert!(remaining.is_empty());

        // A second cancellation finds nothing active
        assert!(store.cancel_meeting(meeting.id).unwrap().is_none());
    }

    #[test]
    fn test_cancel_unknown_meeting_returns_none() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("meetings.csv");
        let store = MeetingStore::new(csv_path.to_str().unwrap());

        assert!(store.cancel_meeting(42).unwrap().is_none());
    }

    #[test]
    fn test_data_survives_reopening_the_store() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("meetings.csv");

        {
            let store = MeetingStore::new(csv_path.to_str().unwrap());
            store
                .insert_meeting(new_meeting("2025-09-29", "09:00", "10:00"))
                .unwrap();
        }

        let reopened = MeetingStore::new(csv_path.to_str().unwrap());
        let meetings = reopened.meetings_for_date(date("2025-09-29")).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].id, 1);

        // Ids keep counting from the persisted maximum
        let next = reopened
            .insert_meeting(new_meeting("2025-09-29", "11:00", "12:00"))
            .unwrap();
        assert_eq!(next.id, 2);
    }
}
