//! Clock-style time formatting

/// Formats seconds as `MM:SS`, or `HH:MM:SS` once there is at least one
/// full hour. Inputs of one second or less never produce minutes or hours;
/// negative and non-finite inputs format as zero.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };

    let hours = if seconds > 1.0 { (seconds / 3600.0).floor() as u64 } else { 0 };
    let total_minutes = if seconds > 1.0 { (seconds / 60.0).floor() as u64 } else { 0 };
    let minutes = total_minutes - hours * 60;
    let secs = (seconds.floor() as u64).saturating_sub(total_minutes * 60);

    if hours != 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.0), "00:59");
        assert_eq!(format_time(60.0), "01:00");
        assert_eq!(format_time(125.7), "02:05");
        assert_eq!(format_time(3599.9), "59:59");
    }

    #[test]
    fn adds_hours_only_when_present() {
        assert_eq!(format_time(3600.0), "01:00:00");
        assert_eq!(format_time(3661.0), "01:01:01");
        assert_eq!(format_time(36000.0 + 59.0), "10:00:59");
    }

    #[test]
    fn sub_second_threshold() {
        assert_eq!(format_time(0.4), "00:00");
        assert_eq!(format_time(1.0), "00:01");
        assert_eq!(format_time(1.5), "00:01");
    }

    #[test]
    fn garbage_in_formats_as_zero() {
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(-12.0), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }
}
