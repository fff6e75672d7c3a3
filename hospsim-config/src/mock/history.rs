use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::schedule::slot_utils::duration_minutes;
use crate::store::{keys, JsonStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecord {
    pub id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    pub duration: String,
    pub total_patients: u32,
    pub avg_waiting_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitingTag {
    Success,
    Warning,
    Error,
}

/// Tag for an average waiting time given as `HH:MM[:SS]`.
/// Unreadable values are flagged as errors.
pub fn waiting_time_tag(avg_waiting_time: &str) -> WaitingTag {
    match duration_minutes(avg_waiting_time) {
        Some(m) if m <= 15 => WaitingTag::Success,
        Some(m) if m <= 30 => WaitingTag::Warning,
        _ => WaitingTag::Error,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: SimulationRecord,
    pub waiting_tag: WaitingTag,
}

impl From<SimulationRecord> for HistoryEntry {
    fn from(record: SimulationRecord) -> Self {
        let waiting_tag = waiting_time_tag(&record.avg_waiting_time);
        Self { record, waiting_tag }
    }
}

fn seed_records() -> Vec<SimulationRecord> {
    let record = |id: &str, duration: &str, total_patients, avg_waiting_time: &str| SimulationRecord {
        id: id.to_string(),
        date: "2024/11/13 13:23:11".to_string(),
        note: None,
        template_name: None,
        duration: duration.to_string(),
        total_patients,
        avg_waiting_time: avg_waiting_time.to_string(),
    };

    let first = record("1", "02:30:00", 245, "00:15:30");
    let mut second = record("2", "03:00:00", 320, "00:35:20");
    second.template_name = Some("早高峰配置".to_string());
    let mut third = record("3", "01:45:00", 180, "00:20:15");
    third.note = Some("下午测试配置".to_string());
    vec![first, second, third]
}

/// Stored history, or the sample runs when nothing has been stored yet
pub fn load_history(store: &JsonStore) -> Vec<SimulationRecord> {
    store
        .load(keys::SIMULATION_HISTORY)
        .unwrap_or_else(seed_records)
}

pub fn update_note(store: &JsonStore, id: &str, note: &str) -> Result<SimulationRecord> {
    let mut records = load_history(store);
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ConfigError::not_found("simulation record", id))?;

    let note = note.trim();
    record.note = (!note.is_empty()).then(|| note.to_string());
    let updated = record.clone();

    store.save(keys::SIMULATION_HISTORY, &records)?;
    Ok(updated)
}

pub fn delete_record(store: &JsonStore, id: &str) -> Result<()> {
    let mut records = load_history(store);
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        return Err(ConfigError::not_found("simulation record", id));
    }
    store.save(keys::SIMULATION_HISTORY, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn waiting_tags_follow_the_minute_prefix() {
        assert_eq!(waiting_time_tag("00:15:30"), WaitingTag::Success);
        assert_eq!(waiting_time_tag("00:20:15"), WaitingTag::Warning);
        assert_eq!(waiting_time_tag("00:35:20"), WaitingTag::Error);
        assert_eq!(waiting_time_tag("01:00:00"), WaitingTag::Error);
        assert_eq!(waiting_time_tag("soon"), WaitingTag::Error);
    }

    #[test]
    fn history_starts_with_sample_runs() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let records = load_history(&store);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].template_name.as_deref(), Some("早高峰配置"));
        assert!(!store.contains(keys::SIMULATION_HISTORY));

        let entry = HistoryEntry::from(records[0].clone());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["totalPatients"], 245);
        assert_eq!(json["waitingTag"], "success");
        assert!(json.get("note").is_none());
    }

    #[test]
    fn notes_are_updated_and_records_deleted() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let updated = update_note(&store, "1", " 晨间对照 ").unwrap();
        assert_eq!(updated.note.as_deref(), Some("晨间对照"));
        assert_eq!(load_history(&store)[0].note.as_deref(), Some("晨间对照"));

        // clearing the note removes it
        update_note(&store, "3", "").unwrap();
        assert_eq!(load_history(&store)[2].note, None);

        delete_record(&store, "2").unwrap();
        let ids: Vec<String> = load_history(&store).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert!(matches!(
            delete_record(&store, "2"),
            Err(ConfigError::NotFound { .. })
        ));
        assert!(update_note(&store, "9", "x").is_err());
    }
}
