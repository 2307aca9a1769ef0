use chrono::{Datelike, Months, NaiveDate};

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a stored record date.
///
/// Accepts plain `YYYY-MM-DD` as well as full ISO timestamps whose first ten
/// characters are a date (older clients serialized `Date` objects that way).
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = match trimmed.len() {
        10 => trimmed,
        len if len > 10 => {
            let (head, tail) = trimmed.split_at(10);
            if !tail.starts_with('T') && !tail.starts_with(' ') {
                return None;
            }
            head
        }
        _ => return None,
    };
    if !looks_like_iso_date(date_part) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// First day of the month `months` before the month containing `date`.
pub fn month_start_before(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.checked_sub_months(Months::new(months))
}

/// Signed number of calendar months from `earlier`'s month to `later`'s month.
pub fn month_offset(later: NaiveDate, earlier: NaiveDate) -> i64 {
    let years = i64::from(later.year()) - i64::from(earlier.year());
    let months = i64::from(later.month()) - i64::from(earlier.month());
    years * 12 + months
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

/// Serde adapter writing `YYYY-MM-DD` and reading anything `parse_record_date` accepts.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::{format_iso_date, parse_record_date};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_iso_date(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_record_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid calendar date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{format_iso_date, month_offset, month_start_before, parse_record_date};

    #[test]
    fn record_dates_accept_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 5);
        assert_eq!(parse_record_date("2026-03-05"), expected);
        assert_eq!(parse_record_date("2026-03-05T00:00:00.000Z"), expected);
        assert_eq!(parse_record_date("2026-03-05 12:30:00"), expected);
    }

    #[test]
    fn record_dates_reject_garbage() {
        assert_eq!(parse_record_date(""), None);
        assert_eq!(parse_record_date("2026-02-30"), None);
        assert_eq!(parse_record_date("yesterday"), None);
        assert_eq!(parse_record_date("2026-03-05junk"), None);
    }

    #[test]
    fn month_helpers_cross_year_boundaries() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 20);
        let nov = NaiveDate::from_ymd_opt(2025, 11, 30);
        assert!(jan.is_some() && nov.is_some());
        if let (Some(jan), Some(nov)) = (jan, nov) {
            assert_eq!(month_offset(jan, nov), 2);
            let start = month_start_before(jan, 2);
            assert_eq!(start.map(|d| format_iso_date(&d)), Some("2025-11-01".to_string()));
        }
    }
}
