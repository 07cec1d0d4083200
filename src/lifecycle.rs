//! Event lifecycle rules that depend on the calendar.

use chrono::{Local, NaiveDate, NaiveDateTime};

const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether registration for an event dated `date` is still permitted right now,
/// according to the process's local clock.
pub fn is_registration_window_open(date: Option<&str>) -> bool {
    is_registration_window_open_at(date, Local::now().naive_local())
}

/// Registration closes at local midnight starting the event date. Missing,
/// empty or unparseable dates count as closed.
pub fn is_registration_window_open_at(date: Option<&str>, now: NaiveDateTime) -> bool {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return false;
    };

    NaiveDate::parse_from_str(date, EVENT_DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .is_some_and(|midnight| now < midnight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn open_until_the_last_second_before_the_event_date() {
        assert!(is_registration_window_open_at(
            Some("2025-10-10"),
            at("2025-10-09T23:59:59")
        ));
    }

    #[test]
    fn closed_from_midnight_of_the_event_date() {
        assert!(!is_registration_window_open_at(
            Some("2025-10-10"),
            at("2025-10-10T00:00:00")
        ));
        assert!(!is_registration_window_open_at(
            Some("2025-10-10"),
            at("2025-10-11T09:30:00")
        ));
    }

    #[test]
    fn missing_or_empty_date_is_closed() {
        let now = at("2000-01-01T00:00:00");
        assert!(!is_registration_window_open_at(None, now));
        assert!(!is_registration_window_open_at(Some(""), now));
        assert!(!is_registration_window_open_at(Some("   "), now));
    }

    #[test]
    fn unparseable_date_is_closed() {
        let now = at("2000-01-01T00:00:00");
        assert!(!is_registration_window_open_at(Some("next friday"), now));
        assert!(!is_registration_window_open_at(Some("2025-13-40"), now));
    }

    #[test]
    fn far_future_date_is_open_now() {
        assert!(is_registration_window_open(Some("2999-01-01")));
        assert!(!is_registration_window_open(Some("1999-01-01")));
    }
}
