use chrono::{NaiveTime, Timelike};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Start of the simulated day. Times before it belong to the next day.
pub const DAY_ANCHOR: &str = "06:30";
pub const DAY_ANCHOR_MINUTES: u32 = 6 * 60 + 30;

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(time_str.trim(), "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Re-renders a well-formed time as zero-padded HH:MM; anything else is returned untouched
pub fn normalize_time(time_str: &str) -> String {
    match parse_time_to_minutes(time_str) {
        Some(minutes) => minutes_to_time_string(minutes),
        None => time_str.to_string(),
    }
}

/// Minutes elapsed since the day anchor, wrapping past midnight
pub fn minutes_since_anchor(minutes: u32) -> u32 {
    (minutes + MINUTES_PER_DAY - DAY_ANCHOR_MINUTES) % MINUTES_PER_DAY
}

/// True for times in the early-morning window 00:00..=06:30 that display as "next day"
pub fn is_next_day_time(time_str: &str) -> bool {
    parse_time_to_minutes(time_str).is_some_and(|m| m <= DAY_ANCHOR_MINUTES)
}

/// Builds consecutive half-hour slot labels ("07:00-07:30") covering [start, end)
pub fn half_hour_slots(start_minutes: u32, end_minutes: u32) -> Vec<String> {
    (start_minutes..end_minutes)
        .step_by(30)
        .map(|m| {
            format!(
                "{}-{}",
                minutes_to_time_string(m),
                minutes_to_time_string(m + 30)
            )
        })
        .collect()
}

/// Parses an "HH:MM[:SS]" duration and returns whole minutes (hours * 60 + minutes).
/// `None` when malformed or too long to count in minutes.
pub fn duration_minutes(duration: &str) -> Option<u32> {
    let mut parts = duration.trim().split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

#[cfg(test)]
#[path = "slot_utils_test.rs"]
mod tests;
