use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::parser::parse_decimal;
use crate::schedule::slot_utils::half_hour_slots;
use crate::store::keys;
use crate::templates::FlowTemplate;

use super::{Cell, FlowRow};

pub const MAX_MEAN_ARRIVALS: f64 = 200.0;
pub const MAX_STD_DEVIATION: f64 = 50.0;

/// Patient arrivals at the lab during one half-hour slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalSlot {
    pub time_slot: String,
    pub mean_arrivals: f64,
    pub std_deviation: f64,
}

/// Opening day of the lab: 07:00 up to 20:30, 20 patients ± 5 per slot
fn default_slots() -> Vec<ArrivalSlot> {
    half_hour_slots(7 * 60, 20 * 60 + 30)
        .into_iter()
        .map(|time_slot| ArrivalSlot {
            time_slot,
            mean_arrivals: 20.0,
            std_deviation: 5.0,
        })
        .collect()
}

impl FlowRow for ArrivalSlot {
    const TEMPLATE_KEY: &'static str = keys::LAB_FLOW_TEMPLATES;
    const ACTIVE_KEY: &'static str = keys::LAB_FLOW_CONFIG;
    const CUSTOM_ID_PREFIX: &'static str = "custom-";
    const SHEET_NAME: &'static str = "时间段配置";
    const FILE_STEM: &'static str = "arrival-time-ranges";
    const HEADERS: &'static [&'static str] = &["时间段", "到达人数平均数", "到达人数标准差"];

    fn defaults() -> Vec<Self> {
        default_slots()
    }

    fn presets() -> Vec<FlowTemplate<Self>> {
        vec![
            FlowTemplate::preset("preset-1", "工作日模板", default_slots()),
            FlowTemplate::preset("preset-2", "周末模板", default_slots()),
        ]
    }

    fn validate(rows: &[Self]) -> Result<()> {
        for row in rows {
            if !(0.0..=MAX_MEAN_ARRIVALS).contains(&row.mean_arrivals) {
                return Err(ConfigError::validation(format!(
                    "{} 到达人数平均数应在0-200之间",
                    row.time_slot
                )));
            }
            if !(0.0..=MAX_STD_DEVIATION).contains(&row.std_deviation) {
                return Err(ConfigError::validation(format!(
                    "{} 到达人数标准差应在0-50之间",
                    row.time_slot
                )));
            }
        }
        Ok(())
    }

    fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.time_slot.clone()),
            Cell::Number(self.mean_arrivals),
            Cell::Number(self.std_deviation),
        ]
    }

    fn from_cells(cells: &[&str]) -> Self {
        let cell = |i: usize| cells.get(i).copied().unwrap_or("");
        Self {
            time_slot: cell(0).to_string(),
            mean_arrivals: parse_decimal(cell(1)),
            std_deviation: parse_decimal(cell(2)),
        }
    }
}
