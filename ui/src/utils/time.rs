use jiff::civil::{Date, Time};
use jiff::{Timestamp, Zoned, tz};

/// Today's date in the browser's timezone.
pub fn today() -> Date {
    Zoned::now().date()
}

/// "Mon, 15 Jan 2024"
pub fn format_date(date: Date) -> String {
    date.strftime("%a, %d %b %Y").to_string()
}

/// "09:30"
pub fn format_time(time: Time) -> String {
    time.strftime("%H:%M").to_string()
}

pub fn format_time_range(start: Time, end: Time) -> String {
    format!("{} - {}", format_time(start), format_time(end))
}

/// A backend timestamp in local time, e.g. "15 Jan 2024, 09:30".
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp
        .to_zoned(tz::TimeZone::system())
        .strftime("%d %b %Y, %H:%M")
        .to_string()
}

/// Short relative description used by notification and activity lists.
pub fn time_ago(timestamp: Timestamp, now: Timestamp) -> String {
    let seconds = now.as_second() - timestamp.as_second();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

/// Parse the value of an `<input type="date">`.
pub fn parse_date_input(value: &str) -> Option<Date> {
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::{date, time};

    #[test]
    fn formats_dates_and_times() {
        assert_eq!(format_date(date(2024, 1, 15)), "Mon, 15 Jan 2024");
        assert_eq!(
            format_time_range(time(9, 30, 0, 0), time(10, 0, 0, 0)),
            "09:30 - 10:00"
        );
    }

    #[test]
    fn relative_times() {
        let now: Timestamp = "2024-01-15T12:00:00Z".parse().unwrap();
        let ago = |s: i64| Timestamp::from_second(now.as_second() - s).unwrap();
        assert_eq!(time_ago(ago(5), now), "just now");
        assert_eq!(time_ago(ago(120), now), "2m ago");
        assert_eq!(time_ago(ago(7_200), now), "2h ago");
        assert_eq!(time_ago(ago(3 * 86_400), now), "3d ago");
    }

    #[test]
    fn date_inputs() {
        assert_eq!(parse_date_input("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date_input(""), None);
    }
}
