use super::*;
use tempfile::TempDir;

fn temp_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path().join("store")).unwrap();
    (dir, store)
}

#[test]
fn missing_key_loads_as_empty_list() {
    let (_dir, store) = temp_store();
    let list: Vec<String> = store.load_list("nothing-here");
    assert!(list.is_empty());
    assert!(!store.contains("nothing-here"));
}

#[test]
fn save_then_load_returns_same_document() {
    let (_dir, store) = temp_store();
    store.save("names", &vec!["a".to_string(), "b".to_string()]).unwrap();

    let list: Vec<String> = store.load_list("names");
    assert_eq!(list, vec!["a", "b"]);
    assert!(store.contains("names"));
}

#[test]
fn malformed_document_is_ignored() {
    let (_dir, store) = temp_store();
    std::fs::write(store.root().join("broken.json"), "{not json").unwrap();

    let list: Vec<u32> = store.load_list("broken");
    assert!(list.is_empty());
}

#[test]
fn wrong_shape_is_ignored() {
    let (_dir, store) = temp_store();
    store.save("numbers", &serde_json::json!({"not": "a list"})).unwrap();

    let list: Vec<u32> = store.load_list("numbers");
    assert!(list.is_empty());
}

#[test]
fn last_write_wins_and_remove_clears() {
    let (_dir, store) = temp_store();
    store.save("n", &1u32).unwrap();
    store.save("n", &2u32).unwrap();
    assert_eq!(store.load::<u32>("n"), Some(2));

    store.remove("n").unwrap();
    assert_eq!(store.load::<u32>("n"), None);
    // removing twice is fine
    store.remove("n").unwrap();
}
