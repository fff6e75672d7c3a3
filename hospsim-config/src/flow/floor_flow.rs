use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::parse_number;
use crate::schedule::floors::FLOOR_COUNT;
use crate::store::keys;
use crate::templates::FlowTemplate;

use super::{Cell, FlowRow};

/// Weekend traffic relative to a working day
const WEEKEND_FACTOR: f64 = 0.7;

/// Passengers leaving and arriving at one floor, split by half-day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorFlow {
    pub floor: String,
    pub morning_out: u32,
    pub morning_in: u32,
    pub afternoon_out: u32,
    pub afternoon_in: u32,
}

impl FloorFlow {
    fn scaled(&self, factor: f64) -> Self {
        let scale = |v: u32| (f64::from(v) * factor).round() as u32;
        Self {
            floor: self.floor.clone(),
            morning_out: scale(self.morning_out),
            morning_in: scale(self.morning_in),
            afternoon_out: scale(self.afternoon_out),
            afternoon_in: scale(self.afternoon_in),
        }
    }
}

fn default_flows() -> Vec<FloorFlow> {
    (1..=FLOOR_COUNT)
        .map(|floor| FloorFlow {
            floor: format!("{floor}楼"),
            morning_out: 210,
            morning_in: 24,
            afternoon_out: 231,
            afternoon_in: 244,
        })
        .collect()
}

impl FlowRow for FloorFlow {
    const TEMPLATE_KEY: &'static str = keys::ELEVATOR_FLOW_TEMPLATES;
    const ACTIVE_KEY: &'static str = keys::ELEVATOR_FLOW_CONFIG;
    const CUSTOM_ID_PREFIX: &'static str = "";
    const SHEET_NAME: &'static str = "楼层客流配置";
    const FILE_STEM: &'static str = "floor-flow";
    const HEADERS: &'static [&'static str] = &["楼层", "上午出发", "上午到达", "下午出发", "下午到达"];

    fn defaults() -> Vec<Self> {
        default_flows()
    }

    fn presets() -> Vec<FlowTemplate<Self>> {
        let weekday = default_flows();
        let weekend = weekday.iter().map(|f| f.scaled(WEEKEND_FACTOR)).collect();
        vec![
            FlowTemplate::preset("1", "工作日模板", weekday),
            FlowTemplate::preset("2", "周末模板", weekend),
        ]
    }

    // Counts are unsigned, so any table is acceptable
    fn validate(_rows: &[Self]) -> Result<()> {
        Ok(())
    }

    fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.floor.clone()),
            Cell::Number(f64::from(self.morning_out)),
            Cell::Number(f64::from(self.morning_in)),
            Cell::Number(f64::from(self.afternoon_out)),
            Cell::Number(f64::from(self.afternoon_in)),
        ]
    }

    fn from_cells(cells: &[&str]) -> Self {
        let cell = |i: usize| cells.get(i).copied().unwrap_or("");
        Self {
            floor: cell(0).to_string(),
            morning_out: parse_number(cell(1)),
            morning_in: parse_number(cell(2)),
            afternoon_out: parse_number(cell(3)),
            afternoon_in: parse_number(cell(4)),
        }
    }
}
