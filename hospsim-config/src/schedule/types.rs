use serde::{Deserialize, Serialize};

/// A daily boundary at which an elevator's served floors change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub time: String,
    pub floors: Vec<String>,
}

/// A derived interval of the day with the floors served during it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
    pub floors: Vec<String>,
}

/// Saved schedule of one elevator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorConfig {
    pub id: String,
    pub name: String,
    pub initial_floor: u8,
    pub time_ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevatorStatus {
    Idle,
    Moving,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elevator {
    pub id: String,
    pub name: String,
    pub current_floor: u8,
    pub status: ElevatorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ElevatorConfig>,
}
