use mod_curator_core::index::CuratedIndex;
use mod_curator_core::model::{Changelogs, EntryState, FileRecord, FinalRecord, ModId};
use mod_curator_core::output::{persist, render, WriteOutcome};
use std::fs;
use tempfile::tempdir;

fn record(id: u64) -> FinalRecord {
    FinalRecord {
        mod_id: ModId(id),
        name: format!("mod {id}"),
        summary: None,
        version: Some("1.0".into()),
        picture_url: None,
        author: None,
        updated_timestamp: 1,
        created_timestamp: 1,
        description: None,
        files: vec![FileRecord {
            file_id: id * 100,
            category_name: Some("MAIN".into()),
            version: Some("1.0".into()),
            uploaded_timestamp: 2,
            file_name: format!("{id}.zip"),
            description: None,
        }],
        changelogs: Changelogs::new(),
        state: EntryState::Normal,
        warning_message: String::new(),
    }
}

#[test]
fn render_sorts_numerically_not_lexically() {
    let rendered = render(vec![record(30), record(2), record(100)]).unwrap();
    let parsed: Vec<FinalRecord> = serde_json::from_str(&rendered).unwrap();
    let ids: Vec<u64> = parsed.iter().map(|r| r.mod_id.0).collect();
    assert_eq!(ids, vec![2, 30, 100]);
}

#[test]
fn render_is_deterministic_and_keeps_field_order() {
    let a = render(vec![record(2), record(1)]).unwrap();
    let b = render(vec![record(1), record(2)]).unwrap();
    assert_eq!(a, b);
    assert!(a.ends_with("]\n"));

    let mod_id = a.find("\"mod_id\"").unwrap();
    let files = a.find("\"files\"").unwrap();
    let warning = a.find("\"warningMessage\"").unwrap();
    assert!(mod_id < files && files < warning);
    assert!(a.contains("\n  {\n    \"mod_id\": 1,"));
}

#[test]
fn render_collapses_duplicate_ids() {
    let mut second = record(5);
    second.name = "replacement".into();
    let parsed: Vec<FinalRecord> =
        serde_json::from_str(&render(vec![record(5), second]).unwrap()).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].name, "replacement");
}

#[test]
fn persist_writes_only_on_difference() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("curated.json");
    let rendered = render(vec![record(1)]).unwrap();

    assert_eq!(persist(&path, &rendered, false).unwrap(), WriteOutcome::Written);
    assert_eq!(fs::read_to_string(&path).unwrap(), rendered);
    assert_eq!(persist(&path, &rendered, false).unwrap(), WriteOutcome::Unchanged);

    let changed = render(vec![record(1), record(2)]).unwrap();
    assert_eq!(persist(&path, &changed, true).unwrap(), WriteOutcome::DryRun);
    assert_eq!(fs::read_to_string(&path).unwrap(), rendered);
    assert_eq!(persist(&path, &changed, false).unwrap(), WriteOutcome::Written);
    assert_eq!(fs::read_to_string(&path).unwrap(), changed);
}

#[test]
fn index_treats_absent_ids_as_not_curated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curated.json");
    assert!(CuratedIndex::load(&path).unwrap().is_empty());

    fs::write(&path, render(vec![record(7)]).unwrap()).unwrap();
    let index = CuratedIndex::load(&path).unwrap();

    assert!(index.get(ModId(7)).is_some());
    assert!(index.get(ModId(8)).is_none());
    assert_eq!(index.file(ModId(7), 700).unwrap().file_name, "7.zip");
    assert!(index.file(ModId(7), 1).is_none());
}
