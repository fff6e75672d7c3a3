use crate::error::{ConfigError, Result};
use crate::flow::Scenario;
use crate::lab::{SpecialWindowType, WindowSettings};
use crate::schedule::slot_utils::parse_time_to_minutes;

pub const MAX_SPECIAL_TYPE_NAME_CHARS: usize = 10;
pub const MIN_PROCESS_TIME: u32 = 1;
pub const MAX_PROCESS_TIME: u32 = 3600;
pub const MAX_OPEN_RANGES: usize = 3;

/// Validates the free-text name of a custom special window type
pub fn validate_special_type_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::validation("请输入窗口类型名称"));
    }
    if name.trim().chars().count() > MAX_SPECIAL_TYPE_NAME_CHARS {
        return Err(ConfigError::validation("类型名称不能超过10个字符"));
    }
    Ok(())
}

/// Validates a window's parameter form
pub fn validate_window_settings(
    settings: &WindowSettings,
    special_types: &[SpecialWindowType],
) -> Result<()> {
    // Validate process time
    if !(MIN_PROCESS_TIME..=MAX_PROCESS_TIME).contains(&settings.process_time) {
        return Err(ConfigError::validation("处理时间范围为1-3600秒"));
    }

    // Validate special window type if selected
    if let Some(type_id) = &settings.special_type_id {
        if !special_types.iter().any(|t| &t.id == type_id) {
            return Err(ConfigError::validation("请选择特殊窗口类型"));
        }
    }

    // Validate opening hours
    if settings.time_ranges.is_empty() {
        return Err(ConfigError::validation("至少需要1个开设时间段"));
    }
    if settings.time_ranges.len() > MAX_OPEN_RANGES {
        return Err(ConfigError::validation("最多可添加3个时间段"));
    }

    let mut spans = Vec::with_capacity(settings.time_ranges.len());
    for range in &settings.time_ranges {
        let (Some(start), Some(end)) = (
            parse_time_to_minutes(&range.start),
            parse_time_to_minutes(&range.end),
        ) else {
            return Err(ConfigError::validation("时间格式为 HH:mm，如 09:30"));
        };
        if start >= end {
            return Err(ConfigError::validation(format!(
                "{}-{} 开始时间必须早于结束时间",
                range.start, range.end
            )));
        }
        spans.push((start, end));
    }

    // Ranges touching end-to-start are fine, any shared minute is not
    spans.sort_unstable();
    if spans.windows(2).any(|pair| pair[1].0 < pair[0].1) {
        return Err(ConfigError::validation("每个时间段不能重叠"));
    }

    Ok(())
}

/// Resolves the simulation speed multiplier. An empty or zero entry falls
/// back to the scenario default.
pub fn resolve_speed(scenario: Scenario, value: Option<u32>) -> Result<u32> {
    let (default, max, message) = match scenario {
        Scenario::Lab => (1, 100, "仿真速度应在1-100倍之间"),
        Scenario::Elevator => (1000, 10_000, "推演速度应在1-10000倍之间"),
    };

    match value {
        None | Some(0) => Ok(default),
        Some(v) if v <= max => Ok(v),
        Some(_) => Err(ConfigError::validation(message)),
    }
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
