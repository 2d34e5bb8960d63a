//! Formatting helpers shared across report outputs.

use crate::time::ClockTime;

/// Format minutes as hours and minutes (e.g., "7h 45m").
pub fn format_duration_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as i64;
    format!("{}h {}m", total / 60, total % 60)
}

/// Format sleep debt in hours; debt gets a leading "+", surplus is unsigned.
pub fn format_debt(hours: f64) -> String {
    let total = (hours.abs() * 60.0).round() as i64;
    let sign = if hours > 0.0 && total > 0 { "+" } else { "" };
    format!("{}{}h {}m", sign, total / 60, total % 60)
}

/// Format an hour of day for chart axes (e.g., "12am", "3pm").
pub fn format_hour(hour: u8) -> String {
    match hour {
        0 => "12am".to_string(),
        12 => "12pm".to_string(),
        h if h > 12 => format!("{}pm", h - 12),
        h => format!("{}am", h),
    }
}

/// Format a clock time on a 12-hour dial (e.g., "10:30 PM").
pub fn format_clock_12h(time: ClockTime) -> String {
    let period = if time.hour() >= 12 { "PM" } else { "AM" };
    let hour = match time.hour() {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", hour, time.minute(), period)
}

/// Format millilitres as litres with one decimal (e.g., "1.5L").
pub fn format_litres(ml: i64) -> String {
    format!("{:.1}L", ml as f64 / 1000.0)
}

/// Format a volume, switching to litres from 1000ml (e.g., "750ml", "1.3L").
pub fn format_volume(ml: i64) -> String {
    if ml >= 1000 {
        format_litres(ml)
    } else {
        format!("{}ml", ml)
    }
}

/// Format a percentage rounded to a whole number (e.g., "87%").
pub fn format_percent(pct: f64) -> String {
    format!("{}%", pct.round() as i64)
}
