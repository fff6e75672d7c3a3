//! Passenger flow tables: lab arrivals per half hour and elevator traffic per floor.

pub mod arrivals;
pub mod floor_flow;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::store::JsonStore;
use crate::templates::FlowTemplate;

pub use arrivals::ArrivalSlot;
pub use floor_flow::FloorFlow;

/// The two simulated scenarios; every flow table belongs to one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Lab,
    Elevator,
}

impl FromStr for Scenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lab" => Ok(Self::Lab),
            "elevator" => Ok(Self::Elevator),
            other => Err(ConfigError::not_found("scenario", other)),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lab => write!(f, "lab"),
            Self::Elevator => write!(f, "elevator"),
        }
    }
}

/// One spreadsheet cell. Workbooks store numbers as numbers; CSV writes both as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A row of a flow table, with everything needed to persist, template and
/// exchange it as a spreadsheet.
pub trait FlowRow: Serialize + DeserializeOwned + Clone + PartialEq {
    /// Storage key of the user's custom templates
    const TEMPLATE_KEY: &'static str;
    /// Storage key of the table currently in use
    const ACTIVE_KEY: &'static str;
    const CUSTOM_ID_PREFIX: &'static str;
    /// Worksheet name in exported workbooks
    const SHEET_NAME: &'static str;
    /// Download name without extension
    const FILE_STEM: &'static str;
    /// Localized spreadsheet column headers, in cell order
    const HEADERS: &'static [&'static str];

    fn defaults() -> Vec<Self>;

    fn presets() -> Vec<FlowTemplate<Self>>;

    fn validate(rows: &[Self]) -> Result<()>;

    fn to_cells(&self) -> Vec<Cell>;

    /// Builds a row from cells aligned with `HEADERS`; absent cells arrive as "".
    fn from_cells(cells: &[&str]) -> Self;
}

/// The table in use, or the scenario defaults when nothing was saved
pub fn load_active<R: FlowRow>(store: &JsonStore) -> Vec<R> {
    store.load(R::ACTIVE_KEY).unwrap_or_else(R::defaults)
}

pub fn save_active<R: FlowRow>(store: &JsonStore, rows: &[R]) -> Result<()> {
    R::validate(rows)?;
    store.save(R::ACTIVE_KEY, rows)
}

/// Forgets the saved table so the defaults apply again
pub fn reset_active<R: FlowRow>(store: &JsonStore) -> Result<Vec<R>> {
    if store.contains(R::ACTIVE_KEY) {
        store.remove(R::ACTIVE_KEY)?;
        tracing::info!(sheet = R::SHEET_NAME, "reset flow table to defaults");
    }
    Ok(R::defaults())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scenario_parses_case_insensitively() {
        assert_eq!("Lab".parse::<Scenario>().unwrap(), Scenario::Lab);
        assert_eq!("elevator".parse::<Scenario>().unwrap(), Scenario::Elevator);
        assert!("garage".parse::<Scenario>().is_err());
        assert_eq!(Scenario::Elevator.to_string(), "elevator");
    }

    #[test]
    fn active_table_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let rows: Vec<FloorFlow> = load_active(&store);
        assert_eq!(rows, FloorFlow::defaults());

        let mut edited = rows.clone();
        edited[0].morning_out = 1;
        save_active(&store, &edited).unwrap();
        assert_eq!(load_active::<FloorFlow>(&store), edited);

        assert_eq!(reset_active::<FloorFlow>(&store).unwrap(), rows);
        assert_eq!(load_active::<FloorFlow>(&store), rows);
    }

    #[test]
    fn invalid_table_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let mut rows = ArrivalSlot::defaults();
        rows[3].mean_arrivals = 500.0;
        assert!(save_active(&store, &rows).is_err());
        assert!(!store.contains(ArrivalSlot::ACTIVE_KEY));
    }
}
