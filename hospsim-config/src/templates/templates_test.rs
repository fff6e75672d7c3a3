use super::*;
use crate::flow::{ArrivalSlot, FloorFlow};
use tempfile::TempDir;

fn temp_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn presets_are_listed_before_custom_templates() {
    let (_dir, store) = temp_store();
    let lib = TemplateLibrary::<ArrivalSlot>::new(&store);

    lib.save_custom("早高峰", ArrivalSlot::defaults()).unwrap();
    let ids: Vec<String> = lib.list().into_iter().map(|t| t.id).collect();

    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], "preset-1");
    assert_eq!(ids[1], "preset-2");
    assert!(ids[2].starts_with("custom-"));
}

#[test]
fn template_name_is_required() {
    let (_dir, store) = temp_store();
    let lib = TemplateLibrary::<FloorFlow>::new(&store);

    let err = lib.save_custom("   ", FloorFlow::defaults()).unwrap_err();
    assert_eq!(err.to_string(), "请输入模板名称");
    assert!(lib.custom().is_empty());
}

#[test]
fn saved_names_are_trimmed_and_ids_unique() {
    let (_dir, store) = temp_store();
    let lib = TemplateLibrary::<FloorFlow>::new(&store);

    let a = lib.save_custom("  夜班 ", FloorFlow::defaults()).unwrap();
    let b = lib.save_custom("夜班", FloorFlow::defaults()).unwrap();

    assert_eq!(a.name, "夜班");
    assert_ne!(a.id, b.id);
    assert!(!a.id.starts_with("custom-"));
}

#[test]
fn deleting_a_preset_is_rejected() {
    let (_dir, store) = temp_store();
    let lib = TemplateLibrary::<FloorFlow>::new(&store);
    lib.save_custom("mine", FloorFlow::defaults()).unwrap();

    let err = lib.delete("1").unwrap_err();
    assert!(matches!(err, ConfigError::PresetTemplate { .. }));
    assert_eq!(err.to_string(), "预设模板不能删除");
    assert_eq!(lib.list().len(), 3);
}

#[test]
fn deleting_a_custom_template_removes_only_that_entry() {
    let (_dir, store) = temp_store();
    let lib = TemplateLibrary::<ArrivalSlot>::new(&store);
    let keep_a = lib.save_custom("a", ArrivalSlot::defaults()).unwrap();
    let doomed = lib.save_custom("b", ArrivalSlot::defaults()).unwrap();
    let keep_c = lib.save_custom("c", ArrivalSlot::defaults()).unwrap();

    lib.delete(&doomed.id).unwrap();

    let persisted: Vec<FlowTemplate<ArrivalSlot>> = store.load_list(ArrivalSlot::TEMPLATE_KEY);
    assert_eq!(persisted, vec![keep_a, keep_c]);
    assert!(matches!(lib.delete(&doomed.id), Err(ConfigError::NotFound { .. })));
}

#[test]
fn apply_returns_template_rows() {
    let (_dir, store) = temp_store();
    let lib = TemplateLibrary::<FloorFlow>::new(&store);

    let weekend = lib.apply("2").unwrap();
    assert_eq!(weekend[0].morning_out, 147);
    assert!(lib.apply("missing").is_err());
}

#[test]
fn legacy_lab_templates_with_time_ranges_field_load() {
    let (_dir, store) = temp_store();
    let raw = serde_json::json!([{
        "id": "custom-1",
        "name": "旧模板",
        "timeRanges": [{"timeSlot": "07:00-07:30", "meanArrivals": 3, "stdDeviation": 1}]
    }]);
    store.save(ArrivalSlot::TEMPLATE_KEY, &raw).unwrap();

    let custom = TemplateLibrary::<ArrivalSlot>::new(&store).custom();
    assert_eq!(custom.len(), 1);
    assert!(!custom[0].is_preset);
    assert_eq!(custom[0].data[0].mean_arrivals, 3.0);
}

#[test]
fn display_name_marks_presets() {
    let presets = FloorFlow::presets();
    assert_eq!(presets[0].display_name(), "工作日模板（预设）");
}
