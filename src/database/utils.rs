use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?").unwrap());

/// Collapse whitespace and rewrite `?` placeholders into postgres `$n` form.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 1;
    let mut result = cleaned;
    while let Some(mat) = PLACEHOLDER.find(&result) {
        let replacement = format!("${}", param_index);
        result.replace_range(mat.range(), &replacement);
        param_index += 1;
    }
    result
}

/// Timestamps are stored as fixed-width RFC 3339 strings so that ordering by
/// the raw JSON value is chronological.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numbers_placeholders_in_order() {
        let query = sql(r#"
            SELECT id FROM documents
            WHERE collection = ? AND id = ?
        "#);
        assert_eq!(
            query,
            "SELECT id FROM documents WHERE collection = $1 AND id = $2"
        );
    }

    #[test]
    fn timestamps_sort_chronologically_as_strings() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(format_timestamp(later), "2025-01-10T00:00:00.000000Z");
    }
}
