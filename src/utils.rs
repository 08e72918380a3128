// utils.rs - Small helpers shared by the page templates
use chrono::NaiveDate;

/// Format an event date the way the cards show it, e.g. "March 15, 2025".
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
