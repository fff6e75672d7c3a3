use serde::Serialize;

use super::slot_utils::{
    is_next_day_time, minutes_since_anchor, normalize_time, parse_time_to_minutes, DAY_ANCHOR,
};
use super::types::{Breakpoint, TimeRange};

/// Turns a day's breakpoints into contiguous ranges that start and end at the day anchor.
///
/// Breakpoints are ordered by their position in the simulated day (06:30 first,
/// 06:29 last); equal times keep their input order. Each breakpoint closes the
/// range that began at the previous boundary and carries its own floors. A final
/// range runs from the last breakpoint back to the anchor with `last_floors`, and
/// is the only range that may cross midnight.
///
/// Nothing is validated here: a malformed time is copied through verbatim and
/// sorted after every well-formed one.
pub fn derive_time_ranges(breakpoints: &[Breakpoint], last_floors: &[String]) -> Vec<TimeRange> {
    let mut sorted: Vec<&Breakpoint> = breakpoints.iter().collect();
    sorted.sort_by_key(|bp| match parse_time_to_minutes(&bp.time) {
        Some(minutes) => (0, minutes_since_anchor(minutes)),
        None => (1, 0),
    });

    let mut ranges = Vec::with_capacity(sorted.len() + 1);
    let mut current = DAY_ANCHOR.to_string();
    for bp in sorted {
        let end = normalize_time(&bp.time);
        ranges.push(TimeRange {
            start: current,
            end: end.clone(),
            floors: bp.floors.clone(),
        });
        current = end;
    }

    ranges.push(TimeRange {
        start: current,
        end: DAY_ANCHOR.to_string(),
        floors: last_floors.to_vec(),
    });
    ranges
}

/// Display text for a range, marking early-morning times as next day ("次日").
/// The start of the first range is the anchor itself and is never marked.
pub fn range_label(start: &str, end: &str, is_first: bool) -> String {
    let start_label = if !is_first && is_next_day_time(start) {
        format!("次日 {start}")
    } else {
        start.to_string()
    };
    let end_label = if is_next_day_time(end) {
        format!("次日 {end}")
    } else {
        end.to_string()
    };
    format!("{start_label} 至 {end_label}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledRange {
    #[serde(flatten)]
    pub range: TimeRange,
    pub label: String,
}

pub fn label_ranges(ranges: &[TimeRange]) -> Vec<LabelledRange> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, range)| LabelledRange {
            label: range_label(&range.start, &range.end, i == 0),
            range: range.clone(),
        })
        .collect()
}

#[cfg(test)]
#[path = "derive_test.rs"]
mod tests;
