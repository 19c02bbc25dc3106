use chrono::{DateTime, Datelike, Utc};

/// Derive the human-readable invoice number for a booking.
///
/// Format: `SL-{YYYY}{MM}-{suffix}` where the year/month come from the
/// booking's creation time (fixed at assignment, not the current clock) and
/// the suffix is the last five characters of the record identifier,
/// left-padded with zeros. Two identifiers sharing a five-character tail
/// produce the same invoice number; that collision is accepted and not
/// deduplicated.
pub fn invoice_number(created_at: DateTime<Utc>, record_id: &str) -> String {
    let chars: Vec<char> = record_id.chars().collect();
    let suffix: String = chars[chars.len().saturating_sub(5)..].iter().collect();
    format!(
        "SL-{:04}{:02}-{:0>5}",
        created_at.year(),
        created_at.month(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn short_id_is_zero_padded() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(invoice_number(at, "7"), "SL-202503-00007");
    }

    #[test]
    fn long_id_keeps_rightmost_five() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(invoice_number(at, "64f1a2b3c4d5e6f7a8b9c0d1"), "SL-202412-9c0d1");
    }

    #[test]
    fn month_is_zero_padded() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        assert!(invoice_number(at, "abcde").starts_with("SL-202601-"));
    }

    #[test]
    fn uses_creation_time_not_now() {
        let at = Utc.with_ymd_and_hms(2019, 7, 14, 8, 30, 0).unwrap();
        assert_eq!(invoice_number(at, "12345"), "SL-201907-12345");
    }
}
