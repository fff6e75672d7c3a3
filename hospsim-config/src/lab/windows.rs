use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

use super::special_types::SpecialWindowType;

/// Fixed inspection windows are numbered 1..=10; temporary ones continue after.
pub const FIXED_WINDOW_COUNT: u32 = 10;
pub const MAX_TEMPORARY_WINDOWS: usize = 5;
pub const DEFAULT_PROCESS_TIME: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHours {
    pub start: String,
    pub end: String,
}

/// Service parameters of one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_type_id: Option<String>,
    /// Seconds spent per patient
    pub process_time: u32,
    pub time_ranges: Vec<WindowHours>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            special_type_id: None,
            process_time: DEFAULT_PROCESS_TIME,
            time_ranges: vec![
                WindowHours { start: "07:30".into(), end: "12:30".into() },
                WindowHours { start: "13:30".into(), end: "17:00".into() },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub settings: WindowSettings,
}

fn window_id(number: u32) -> String {
    format!("check{number}")
}

fn window_name(number: u32) -> String {
    format!("检验窗{number}")
}

/// The ten fixed windows, each overridden by its saved settings if any
pub fn fixed_windows(saved: &[WindowConfig]) -> Vec<WindowConfig> {
    (1..=FIXED_WINDOW_COUNT)
        .map(|n| {
            let id = window_id(n);
            saved.iter().find(|w| w.id == id).cloned().unwrap_or(WindowConfig {
                id,
                name: window_name(n),
                settings: WindowSettings::default(),
            })
        })
        .collect()
}

pub fn is_fixed_window(id: &str) -> bool {
    id.strip_prefix("check")
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| (1..=FIXED_WINDOW_COUNT).contains(&n))
}

/// Windows serving one special patient type
pub fn windows_of_type<'a>(windows: &'a [WindowConfig], type_id: &str) -> Vec<&'a WindowConfig> {
    windows
        .iter()
        .filter(|w| w.settings.special_type_id.as_deref() == Some(type_id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialTypeSummary {
    #[serde(rename = "type")]
    pub special_type: SpecialWindowType,
    pub windows: Vec<String>,
}

/// Active special types with the names of the windows assigned to each
pub fn summarize_special_types(
    types: &[SpecialWindowType],
    windows: &[WindowConfig],
) -> Vec<SpecialTypeSummary> {
    types
        .iter()
        .map(|t| SpecialTypeSummary {
            special_type: t.clone(),
            windows: windows_of_type(windows, &t.id)
                .into_iter()
                .map(|w| w.name.clone())
                .collect(),
        })
        .collect()
}

/// Extra window opened for a session; placed on the floor plan later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryWindow {
    pub id: String,
    pub name: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<WindowSettings>,
}

impl TemporaryWindow {
    /// The window's settings in fixed-window form, once it has any
    pub fn to_window_config(&self) -> Option<WindowConfig> {
        self.config.as_ref().map(|settings| WindowConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            settings: settings.clone(),
        })
    }
}

/// Opens the next temporary window, numbered after the highest existing one
pub fn add_temporary_window(windows: &mut Vec<TemporaryWindow>) -> Result<TemporaryWindow> {
    if windows.len() >= MAX_TEMPORARY_WINDOWS {
        return Err(ConfigError::validation("最多可添加5个临时窗口"));
    }

    let highest = windows
        .iter()
        .filter_map(|w| w.id.strip_prefix("check")?.parse::<u32>().ok())
        .fold(FIXED_WINDOW_COUNT, u32::max);
    let number = highest
        .checked_add(1)
        .ok_or_else(|| ConfigError::validation("临时窗口编号已用尽"))?;

    let window = TemporaryWindow {
        id: window_id(number),
        name: window_name(number),
        x: None,
        y: None,
        active: true,
        config: Some(WindowSettings::default()),
    };
    windows.push(window.clone());
    Ok(window)
}

pub fn set_temporary_position(
    windows: &mut [TemporaryWindow],
    id: &str,
    x: f64,
    y: f64,
) -> Result<TemporaryWindow> {
    let window = windows
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or_else(|| ConfigError::not_found("temporary window", id))?;
    window.x = Some(x);
    window.y = Some(y);
    Ok(window.clone())
}

pub fn remove_temporary_window(windows: &mut Vec<TemporaryWindow>, id: &str) -> Result<()> {
    let before = windows.len();
    windows.retain(|w| w.id != id);
    if windows.len() == before {
        return Err(ConfigError::not_found("temporary window", id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "windows_test.rs"]
mod tests;
