use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

use super::derive::derive_time_ranges;
use super::floors::{default_service_floors, unknown_floors, FloorSelection, FLOOR_COUNT};
use super::slot_utils::{normalize_time, parse_time_to_minutes, DAY_ANCHOR_MINUTES};
use super::types::{Breakpoint, ElevatorConfig, TimeRange};

pub const MAX_BREAKPOINTS: usize = 5;

/// Time given to a breakpoint added from the editor
pub const NEW_BREAKPOINT_TIME: &str = "12:00";

/// Editor state for one elevator's schedule, before ranges are derived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub intervals: Vec<Breakpoint>,
    pub last_interval_floors: Vec<String>,
    pub initial_floor: u8,
}

impl Default for ScheduleDraft {
    fn default() -> Self {
        Self {
            intervals: vec![Breakpoint {
                time: NEW_BREAKPOINT_TIME.to_string(),
                floors: default_service_floors(),
            }],
            last_interval_floors: default_service_floors(),
            initial_floor: 1,
        }
    }
}

/// One user action in the schedule editor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DraftEdit {
    AddInterval,
    RemoveInterval { index: usize },
    SetTime { index: usize, time: String },
    SetFloors { index: usize, floors: Vec<String> },
    /// `index: None` targets the closing interval
    QuickSelect { index: Option<usize>, selection: FloorSelection },
    SetInitialFloor { floor: u8 },
    Reset,
}

impl ScheduleDraft {
    /// Rebuilds the editor state from a saved config: every range but the last
    /// contributes its end as a breakpoint, the last one supplies the closing floors.
    pub fn from_config(config: &ElevatorConfig) -> Self {
        let Some((last, rest)) = config.time_ranges.split_last() else {
            return Self {
                initial_floor: config.initial_floor,
                ..Self::default()
            };
        };

        Self {
            intervals: rest
                .iter()
                .map(|range| Breakpoint {
                    time: range.end.clone(),
                    floors: range.floors.clone(),
                })
                .collect(),
            last_interval_floors: last.floors.clone(),
            initial_floor: config.initial_floor,
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) -> Result<()> {
        match edit {
            DraftEdit::AddInterval => {
                if self.intervals.len() >= MAX_BREAKPOINTS {
                    return Err(ConfigError::validation("最多可添加5个时间段"));
                }
                self.intervals.push(Breakpoint {
                    time: NEW_BREAKPOINT_TIME.to_string(),
                    floors: Vec::new(),
                });
            }
            DraftEdit::RemoveInterval { index } => {
                self.check_index(index)?;
                if self.intervals.len() == 1 {
                    return Err(ConfigError::validation("至少保留1个时间段"));
                }
                self.intervals.remove(index);
            }
            DraftEdit::SetTime { index, time } => {
                self.check_index(index)?;
                if parse_time_to_minutes(&time).is_none() {
                    return Err(ConfigError::validation("时间格式应为 HH:mm"));
                }
                self.intervals[index].time = normalize_time(&time);
            }
            DraftEdit::SetFloors { index, floors } => {
                self.check_index(index)?;
                self.intervals[index].floors = floors;
            }
            DraftEdit::QuickSelect { index: Some(index), selection } => {
                self.check_index(index)?;
                self.intervals[index].floors = selection.floors();
            }
            DraftEdit::QuickSelect { index: None, selection } => {
                self.last_interval_floors = selection.floors();
            }
            DraftEdit::SetInitialFloor { floor } => {
                check_initial_floor(floor)?;
                self.initial_floor = floor;
            }
            DraftEdit::Reset => *self = Self::default(),
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.intervals.len() {
            return Err(ConfigError::validation(format!("第{}时间段不存在", index + 1)));
        }
        Ok(())
    }

    /// Checks the draft before it is saved
    pub fn validate(&self) -> Result<()> {
        if self.intervals.is_empty() {
            return Err(ConfigError::validation("至少保留1个时间段"));
        }
        if self.intervals.len() > MAX_BREAKPOINTS {
            return Err(ConfigError::validation("最多可添加5个时间段"));
        }
        check_initial_floor(self.initial_floor)?;

        let mut seen = HashSet::new();
        for (i, interval) in self.intervals.iter().enumerate() {
            let Some(minutes) = parse_time_to_minutes(&interval.time) else {
                return Err(ConfigError::validation(format!("第{}时间段时间格式不正确", i + 1)));
            };
            if minutes == DAY_ANCHOR_MINUTES {
                return Err(ConfigError::validation("时间段不能设置在06:30"));
            }
            if !seen.insert(minutes) {
                return Err(ConfigError::validation("时间段时间不能重复"));
            }
            check_floors(&interval.floors)?;
        }
        check_floors(&self.last_interval_floors)
    }

    pub fn time_ranges(&self) -> Vec<TimeRange> {
        derive_time_ranges(&self.intervals, &self.last_interval_floors)
    }

    /// Validates the draft and derives the config saved for `elevator_id`
    pub fn into_config(self, elevator_id: &str) -> Result<ElevatorConfig> {
        self.validate()?;
        Ok(ElevatorConfig {
            id: elevator_id.to_string(),
            name: elevator_id.to_string(),
            initial_floor: self.initial_floor,
            time_ranges: self.time_ranges(),
        })
    }
}

fn check_initial_floor(floor: u8) -> Result<()> {
    if !(1..=FLOOR_COUNT).contains(&floor) {
        return Err(ConfigError::validation("电梯初始楼层应在1-22之间"));
    }
    Ok(())
}

fn check_floors(floors: &[String]) -> Result<()> {
    let unknown = unknown_floors(floors);
    if !unknown.is_empty() {
        return Err(ConfigError::validation(format!("未知楼层: {}", unknown.join(", "))));
    }
    Ok(())
}

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;
