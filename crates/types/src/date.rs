use chrono::{DateTime, Datelike, Utc};

/// Fixed-locale month abbreviations used for display dates.
const MONTHS_ABBR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Format a publication timestamp as `dd MMM yyyy`, e.g. "15 Mar 2021".
///
/// Always computed on the UTC date so the output is independent of the
/// runtime timezone. The result is presentation-only; keep the raw
/// timestamp around for anything that needs ordering.
pub fn format_display_date(ts: &DateTime<Utc>) -> String {
    format!(
        "{:02} {} {}",
        ts.day(),
        MONTHS_ABBR[ts.month0() as usize],
        ts.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_timestamp_is_stable() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).unwrap();
        assert_eq!(format_display_date(&ts), "15 Mar 2021");
    }

    #[test]
    fn test_day_is_zero_padded() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 5, 0, 0, 0).unwrap();
        assert_eq!(format_display_date(&ts), "05 Dez 2024");
    }

    #[test]
    fn test_rfc3339_offset_is_normalized_to_utc() {
        // 23:30 at -03:00 is already the next day in UTC.
        let ts: DateTime<Utc> = DateTime::parse_from_rfc3339("2021-03-14T23:30:00-03:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_display_date(&ts), "15 Mar 2021");
    }
}
