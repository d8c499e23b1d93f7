use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Percentage of the `[start, end]` window elapsed at `now`, in `0.0..=100.0`.
///
/// Both ends are placed on `now`'s calendar day. A window whose end is not
/// after its start crosses midnight: the end moves to the next day, unless
/// `now` sits in the after-midnight tail, in which case the start moves to
/// the previous day instead. Outside the window, and for zero-length
/// windows, the result is `0.0`.
pub fn program_progress(now: NaiveDateTime, start: NaiveTime, end: NaiveTime) -> f64 {
    if start == end {
        return 0.0;
    }

    let day = now.date();
    let mut start_at = day.and_time(start);
    let mut end_at = day.and_time(end);
    if end < start {
        if now.time() <= end {
            start_at -= Duration::days(1);
        } else {
            end_at += Duration::days(1);
        }
    }

    if now < start_at || now > end_at {
        return 0.0;
    }
    let total = (end_at - start_at).num_milliseconds() as f64;
    let elapsed = (now - start_at).num_milliseconds() as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .and_then(|day| day.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn same_day_window() {
        let (start, end) = (time(6, 0), time(10, 0));
        assert_eq!(program_progress(at(5, 59), start, end), 0.0);
        assert_eq!(program_progress(at(6, 0), start, end), 0.0);
        assert!(close(program_progress(at(8, 0), start, end), 50.0));
        assert!(close(program_progress(at(10, 0), start, end), 100.0));
        assert_eq!(program_progress(at(10, 1), start, end), 0.0);
    }

    #[test]
    fn progress_never_decreases_inside_the_window() {
        let (start, end) = (time(13, 0), time(15, 30));
        let mut previous = 0.0;
        for minute in 0..=150 {
            let now = at(13, 0) + Duration::minutes(minute);
            let value = program_progress(now, start, end);
            assert!((0.0..=100.0).contains(&value));
            assert!(value >= previous, "{now}: {value} < {previous}");
            previous = value;
        }
        assert!(close(previous, 100.0));
    }

    #[test]
    fn window_ending_at_midnight() {
        let (start, end) = (time(22, 0), time(0, 0));
        assert!(close(program_progress(at(23, 0), start, end), 50.0));
        assert!(close(program_progress(at(22, 30), start, end), 25.0));
        assert_eq!(program_progress(at(21, 0), start, end), 0.0);
        assert!(close(program_progress(at(0, 0), start, end), 100.0));
    }

    #[test]
    fn after_midnight_tail_counts_from_the_previous_evening() {
        let (start, end) = (time(23, 0), time(1, 0));
        assert!(close(program_progress(at(0, 0), start, end), 50.0));
        assert!(close(program_progress(at(23, 30), start, end), 25.0));
        assert!(close(program_progress(at(0, 30), start, end), 75.0));
        assert!(close(program_progress(at(1, 0), start, end), 100.0));
        assert_eq!(program_progress(at(2, 0), start, end), 0.0);
    }

    #[test]
    fn zero_length_window_is_empty() {
        assert_eq!(program_progress(at(8, 0), time(8, 0), time(8, 0)), 0.0);
    }
}
