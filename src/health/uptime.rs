//! Uptime formatting: `H:MM:SS.ffffff`, with `N day(s), ` beyond 24 hours.

use chrono::TimeDelta;

pub fn format_uptime(elapsed: TimeDelta) -> String {
    let micros_total = elapsed.num_microseconds().unwrap_or(i64::MAX).max(0);
    let secs_total = micros_total / 1_000_000;
    let micros = micros_total % 1_000_000;

    let days = secs_total / 86_400;
    let hours = (secs_total % 86_400) / 3600;
    let minutes = (secs_total % 3600) / 60;
    let seconds = secs_total % 60;

    let clock = format!("{}:{:02}:{:02}.{:06}", hours, minutes, seconds, micros);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_a_minute() {
        let elapsed = TimeDelta::milliseconds(12_345);
        assert_eq!(format_uptime(elapsed), "0:00:12.345000");
    }

    #[test]
    fn test_hours_are_not_padded() {
        let elapsed = TimeDelta::seconds(5 * 3600 + 7 * 60 + 9) + TimeDelta::microseconds(42);
        assert_eq!(format_uptime(elapsed), "5:07:09.000042");
    }

    #[test]
    fn test_days_prefix() {
        assert_eq!(format_uptime(TimeDelta::days(1)), "1 day, 0:00:00.000000");
        assert_eq!(
            format_uptime(TimeDelta::days(3) + TimeDelta::seconds(61)),
            "3 days, 0:01:01.000000"
        );
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_uptime(TimeDelta::seconds(-5)), "0:00:00.000000");
    }
}
