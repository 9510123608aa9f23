//! Wall-clock arithmetic on `HH:MM` strings.
//!
//! Pure functions with no state; everything downstream (layout, conflict
//! detection, slot search) funnels time handling through here so malformed
//! strings fail in exactly one place.

use crate::error::ScheduleError;

/// Number of minutes in a day; valid offsets are `0..=MINUTES_PER_DAY - 1`.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Parse an `HH:MM` string into minutes from midnight.
pub fn time_to_minutes(time: &str) -> Result<i32, ScheduleError> {
    let (hours_part, minutes_part) = time
        .split_once(':')
        .ok_or_else(|| ScheduleError::InvalidFormat(time.to_string()))?;

    // A second colon (e.g. "09:00:00") is not the HH:MM shape
    if minutes_part.contains(':') {
        return Err(ScheduleError::InvalidFormat(time.to_string()));
    }

    let hours: i32 = hours_part
        .trim()
        .parse()
        .map_err(|_| ScheduleError::InvalidFormat(time.to_string()))?;
    let minutes: i32 = minutes_part
        .trim()
        .parse()
        .map_err(|_| ScheduleError::InvalidFormat(time.to_string()))?;

    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(ScheduleError::InvalidFormat(time.to_string()));
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes from midnight as `HH:MM`.
///
/// No wrapping or clamping is performed: an offset outside `0..=1439` is the
/// caller's bug and fails with `OutOfRange`.
pub fn minutes_to_time(minutes: i32) -> Result<String, ScheduleError> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return Err(ScheduleError::OutOfRange(minutes));
    }
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Half-open interval overlap: touching endpoints do not overlap.
pub fn overlaps(start1: i32, end1: i32, start2: i32, end2: i32) -> bool {
    start1 < end2 && start2 < end1
}

/// Duration of `[start, end)` in minutes.
pub fn duration_minutes(start: &str, end: &str) -> Result<i32, ScheduleError> {
    let duration = time_to_minutes(end)? - time_to_minutes(start)?;
    if duration <= 0 {
        return Err(ScheduleError::NonPositiveDuration);
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("00:00").unwrap(), 0);
        assert_eq!(time_to_minutes("08:00").unwrap(), 480);
        assert_eq!(time_to_minutes("09:30").unwrap(), 570);
        assert_eq!(time_to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_time_to_minutes_rejects_bad_input() {
        for bad in ["", "9am", "0900", "24:00", "12:60", "09:00:00", "-1:30", ":30", "12:"] {
            let result = time_to_minutes(bad);
            assert_eq!(
                result,
                Err(ScheduleError::InvalidFormat(bad.to_string())),
                "expected InvalidFormat for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_minutes_to_time() {
        assert_eq!(minutes_to_time(0).unwrap(), "00:00");
        assert_eq!(minutes_to_time(480).unwrap(), "08:00");
        assert_eq!(minutes_to_time(1439).unwrap(), "23:59");
    }

    #[test]
    fn test_minutes_to_time_out_of_range() {
        assert_eq!(minutes_to_time(-1), Err(ScheduleError::OutOfRange(-1)));
        assert_eq!(minutes_to_time(1440), Err(ScheduleError::OutOfRange(1440)));
    }

    #[test]
    fn test_round_trip() {
        for minutes in [0, 15, 480, 555, 1200, 1439] {
            let formatted = minutes_to_time(minutes).unwrap();
            assert_eq!(time_to_minutes(&formatted).unwrap(), minutes);
        }
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let pairs = [
            (540, 600, 570, 630),
            (540, 600, 600, 660),
            (540, 600, 500, 550),
            (540, 600, 540, 600),
        ];
        for (s1, e1, s2, e2) in pairs {
            assert_eq!(overlaps(s1, e1, s2, e2), overlaps(s2, e2, s1, e1));
        }
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        // 09:00-10:00 vs 10:00-11:00
        assert!(!overlaps(540, 600, 600, 660));
        assert!(!overlaps(600, 660, 540, 600));
        // genuine overlap
        assert!(overlaps(540, 600, 570, 630));
        // containment
        assert!(overlaps(540, 660, 570, 600));
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(duration_minutes("09:00", "10:00").unwrap(), 60);
        assert_eq!(duration_minutes("09:00", "09:15").unwrap(), 15);
    }

    #[test]
    fn test_duration_must_be_positive() {
        assert_eq!(
            duration_minutes("10:00", "10:00"),
            Err(ScheduleError::NonPositiveDuration)
        );
        assert_eq!(
            duration_minutes("10:00", "09:00"),
            Err(ScheduleError::NonPositiveDuration)
        );
    }
}
