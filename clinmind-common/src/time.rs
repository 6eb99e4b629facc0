//! Timestamp utilities and local date/time rendering

use chrono::{DateTime, Local, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Rendered local date/time parts for a record timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTimestamp {
    /// Local calendar date, `dd/mm/yyyy`
    pub date: String,
    /// Local wall-clock time, `HH:MM`
    pub time: String,
    /// `"<date> <time>"`, the form shown in history rows
    pub full: String,
}

/// Render a UTC timestamp in the local timezone.
///
/// History search matches against the `full` form, so the format here is
/// part of the filtering contract, not just display.
pub fn render_local(ts: DateTime<Utc>) -> RenderedTimestamp {
    let local = ts.with_timezone(&Local);
    let date = local.format("%d/%m/%Y").to_string();
    let time = local.format("%H:%M").to_string();
    let full = format!("{} {}", date, time);
    RenderedTimestamp { date, time, full }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_render_local_shape() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 12, 30, 0).unwrap();
        let rendered = render_local(ts);
        // Exact values depend on the host timezone; the shape does not.
        assert_eq!(rendered.date.len(), 10);
        assert_eq!(rendered.time.len(), 5);
        assert_eq!(rendered.full, format!("{} {}", rendered.date, rendered.time));
    }

    #[test]
    fn test_render_local_date_is_day_month_year() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        let rendered = render_local(ts);
        let parts: Vec<&str> = rendered.date.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 4); // year last
    }
}
