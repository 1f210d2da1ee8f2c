//! Shared utility functions for OWF crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Canonical three-letter month labels, in calendar order.
    /// Fixed set, independent of process locale.
    pub const MONTH_LABELS: [&str; 12] = [
        "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string from a scenario table.
    ///
    /// Accepts "YYYY-MM-DD", "YYYY-MM-DD HH:MM:SS" (timestamp exports keep
    /// a midnight time component), and compact "YYYYMMDD".
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt.date());
        }
        Ok(NaiveDate::parse_from_str(trimmed, "%Y%m%d")?)
    }

    /// Calendar year of a date.
    pub fn year_of(date: &NaiveDate) -> i32 {
        date.year()
    }

    /// Three-letter label for a calendar month (1-12).
    pub fn month_label(date: &NaiveDate) -> &'static str {
        MONTH_LABELS[date.month0() as usize]
    }

}
