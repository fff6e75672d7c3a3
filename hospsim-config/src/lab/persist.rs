use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::form::validate_window_settings;
use crate::store::{keys, JsonStore};

use super::ratios::PatientRatios;
use super::special_types::{add_special_type, remove_special_type, SpecialWindowType};
use super::windows::{
    add_temporary_window, fixed_windows, is_fixed_window, remove_temporary_window,
    set_temporary_position, summarize_special_types, SpecialTypeSummary, TemporaryWindow,
    WindowConfig, WindowSettings,
};

pub fn load_special_types(store: &JsonStore) -> Vec<SpecialWindowType> {
    store.load_list(keys::SPECIAL_WINDOW_TYPES)
}

pub fn create_special_type(store: &JsonStore, name: &str) -> Result<SpecialWindowType> {
    let mut types = load_special_types(store);
    let added = add_special_type(&mut types, name)?;
    store.save(keys::SPECIAL_WINDOW_TYPES, &types)?;

    tracing::info!(id = %added.id, name = %added.name, "added special window type");
    Ok(added)
}

fn type_ids(types: &[SpecialWindowType]) -> Vec<String> {
    types.iter().map(|t| t.id.clone()).collect()
}

/// Removes a type together with its patient ratio. The ratio is written
/// first, so a ratio never outlives its type in the store.
pub fn delete_special_type(store: &JsonStore, id: &str) -> Result<()> {
    let mut types = load_special_types(store);
    remove_special_type(&mut types, id)?;

    let mut ratios = load_ratios(store);
    let before = ratios.entries().len();
    ratios.retain_types(&type_ids(&types));
    if ratios.entries().len() != before {
        store.save(keys::PATIENT_TYPE_RATIOS, &ratios)?;
    }
    store.save(keys::SPECIAL_WINDOW_TYPES, &types)
}

pub fn load_windows(store: &JsonStore) -> Vec<WindowConfig> {
    fixed_windows(&store.load_list::<WindowConfig>(keys::WINDOW_CONFIGS))
}

/// Special types in use with the windows serving each, temporary windows included
pub fn load_special_summary(store: &JsonStore) -> Vec<SpecialTypeSummary> {
    let mut windows = load_windows(store);
    windows.extend(
        load_temporary_windows(store)
            .iter()
            .filter_map(TemporaryWindow::to_window_config),
    );
    summarize_special_types(&load_special_types(store), &windows)
}

/// Validates and stores the settings of a fixed or temporary window
pub fn save_window_settings(
    store: &JsonStore,
    id: &str,
    settings: WindowSettings,
) -> Result<WindowSettings> {
    validate_window_settings(&settings, &load_special_types(store))?;

    if is_fixed_window(id) {
        let mut saved: Vec<WindowConfig> = store.load_list(keys::WINDOW_CONFIGS);
        let name = load_windows(store)
            .into_iter()
            .find(|w| w.id == id)
            .map(|w| w.name)
            .unwrap_or_default();
        saved.retain(|w| w.id != id);
        saved.push(WindowConfig {
            id: id.to_string(),
            name,
            settings: settings.clone(),
        });
        store.save(keys::WINDOW_CONFIGS, &saved)?;
    } else {
        let mut temporary = load_temporary_windows(store);
        let window = temporary
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| ConfigError::not_found("window", id))?;
        window.config = Some(settings.clone());
        store.save(keys::TEMPORARY_WINDOWS, &temporary)?;
    }

    tracing::info!(id, "saved window settings");
    Ok(settings)
}

pub fn load_temporary_windows(store: &JsonStore) -> Vec<TemporaryWindow> {
    store.load_list(keys::TEMPORARY_WINDOWS)
}

pub fn open_temporary_window(store: &JsonStore) -> Result<TemporaryWindow> {
    let mut windows = load_temporary_windows(store);
    let window = add_temporary_window(&mut windows)?;
    store.save(keys::TEMPORARY_WINDOWS, &windows)?;
    Ok(window)
}

pub fn place_temporary_window(store: &JsonStore, id: &str, x: f64, y: f64) -> Result<TemporaryWindow> {
    let mut windows = load_temporary_windows(store);
    let window = set_temporary_position(&mut windows, id, x, y)?;
    store.save(keys::TEMPORARY_WINDOWS, &windows)?;
    Ok(window)
}

pub fn close_temporary_window(store: &JsonStore, id: &str) -> Result<()> {
    let mut windows = load_temporary_windows(store);
    remove_temporary_window(&mut windows, id)?;
    store.save(keys::TEMPORARY_WINDOWS, &windows)
}

/// Stored ratios of the special types that still exist
pub fn load_ratios(store: &JsonStore) -> PatientRatios {
    let mut ratios: PatientRatios = store.load(keys::PATIENT_TYPE_RATIOS).unwrap_or_default();
    ratios.retain_types(&type_ids(&load_special_types(store)));
    ratios
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioOverview {
    pub ratios: PatientRatios,
    pub ordinary_share: f64,
}

impl From<PatientRatios> for RatioOverview {
    fn from(ratios: PatientRatios) -> Self {
        let ordinary_share = ratios.ordinary_share();
        Self { ratios, ordinary_share }
    }
}

/// Sets the ratio of an existing special type
pub fn update_ratio(store: &JsonStore, special_type_id: &str, ratio: f64) -> Result<RatioOverview> {
    if !load_special_types(store).iter().any(|t| t.id == special_type_id) {
        return Err(ConfigError::not_found("special window type", special_type_id));
    }

    let mut ratios = load_ratios(store);
    let previous = ratios.ratio_of(special_type_id);
    ratios.set_ratio(special_type_id, ratio)?;
    store.save(keys::PATIENT_TYPE_RATIOS, &ratios)?;

    tracing::info!(special_type_id, previous, ratio, "updated patient ratio");
    Ok(ratios.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::windows::WindowHours;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn deleting_a_type_drops_its_ratio() {
        let (_dir, store) = store();
        let elderly = create_special_type(&store, "老年人专窗").unwrap();
        let vip = create_special_type(&store, "VIP专窗").unwrap();

        update_ratio(&store, &elderly.id, 30.0).unwrap();
        let overview = update_ratio(&store, &vip.id, 20.0).unwrap();
        assert_eq!(overview.ordinary_share, 50.0);

        delete_special_type(&store, &elderly.id).unwrap();
        let ratios = load_ratios(&store);
        assert_eq!(ratios.entries().len(), 1);
        assert_eq!(ratios.ratio_of(&vip.id), 20.0);
    }

    #[test]
    fn ratios_of_missing_types_are_ignored() {
        let (_dir, store) = store();
        let vip = create_special_type(&store, "VIP专窗").unwrap();

        let mut stored = PatientRatios::default();
        stored.set_ratio(&vip.id, 20.0).unwrap();
        stored.set_ratio("removed", 40.0).unwrap();
        store.save(keys::PATIENT_TYPE_RATIOS, &stored).unwrap();

        let overview = RatioOverview::from(load_ratios(&store));
        assert_eq!(overview.ordinary_share, 80.0);
        assert_eq!(overview.ratios.entries().len(), 1);

        // the stale entry no longer counts against the limit
        let overview = update_ratio(&store, &vip.id, 80.0).unwrap();
        assert_eq!(overview.ordinary_share, 20.0);
    }

    #[test]
    fn ratio_requires_known_type() {
        let (_dir, store) = store();
        assert!(matches!(
            update_ratio(&store, "missing", 10.0),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn fixed_window_settings_are_persisted() {
        let (_dir, store) = store();
        let vip = create_special_type(&store, "VIP专窗").unwrap();

        let settings = WindowSettings {
            special_type_id: Some(vip.id.clone()),
            process_time: 90,
            time_ranges: vec![WindowHours { start: "08:00".into(), end: "11:00".into() }],
        };
        save_window_settings(&store, "check3", settings.clone()).unwrap();

        let windows = load_windows(&store);
        assert_eq!(windows.len(), 10);
        assert_eq!(windows[2].name, "检验窗3");
        assert_eq!(windows[2].settings, settings);

        let summary = load_special_summary(&store);
        assert_eq!(summary[0].windows, vec!["检验窗3"]);
    }

    #[test]
    fn temporary_window_lifecycle() {
        let (_dir, store) = store();
        let first = open_temporary_window(&store).unwrap();
        assert_eq!(first.id, "check11");

        let mut settings = WindowSettings::default();
        settings.process_time = 120;
        save_window_settings(&store, "check11", settings).unwrap();
        let placed = place_temporary_window(&store, "check11", 12.5, 40.0).unwrap();
        assert_eq!((placed.x, placed.y), (Some(12.5), Some(40.0)));
        assert_eq!(placed.config.unwrap().process_time, 120);

        assert!(save_window_settings(&store, "check99", WindowSettings::default()).is_err());

        let vip = create_special_type(&store, "VIP专窗").unwrap();
        let mut settings = WindowSettings::default();
        settings.special_type_id = Some(vip.id.clone());
        save_window_settings(&store, "check11", settings).unwrap();
        let summary = load_special_summary(&store);
        assert_eq!(summary[0].windows, vec!["检验窗11"]);

        close_temporary_window(&store, "check11").unwrap();
        assert!(load_special_summary(&store)[0].windows.is_empty());
        assert!(load_temporary_windows(&store).is_empty());
    }
}
