//! End-to-end store behavior: search, staleness boundary, index repair.

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use vellum_rs_core::{PromptRecord, PromptStore, RecordDraft};

fn draft(text: &str, tags: &[&str]) -> RecordDraft {
    RecordDraft {
        text: text.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        ..RecordDraft::default()
    }
}

/// Overwrite a record file in place, bypassing the immutable API the way
/// a hand-edited or corrupted store would.
fn overwrite_record(store: &PromptStore, record: &PromptRecord) {
    let path = store.root().join("records").join(format!("{}.json", record.id));
    std::fs::write(path, serde_json::to_string_pretty(record).expect("encode")).expect("write");
}

#[test]
fn search_matches_substrings_case_insensitively() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let food = store.create(draft("rate this dish", &["food"])).expect("food");
    store.create(draft("unrelated", &["bar"])).expect("bar");

    let by_tag = store.search("foo", "tags").expect("search tags");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, food.id);

    let by_text = store.search("THIS DISH", "text").expect("search text");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].id, food.id);
}

#[test]
fn search_on_unknown_field_matches_nothing() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    store.create(draft("anything", &[])).expect("create");
    assert_eq!(store.search("anything", "created_at").expect("search"), Vec::new());
}

#[test]
fn search_covers_responses() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let with_response = store
        .create(RecordDraft {
            text: "prompt".to_string(),
            response: Some("The capital is Paris".to_string()),
            ..RecordDraft::default()
        })
        .expect("create");
    store.create(draft("no response here", &[])).expect("other");

    let hits = store.search("paris", "response").expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, with_response.id);
}

#[test]
fn outdated_check_is_clean_for_ordinary_forks() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let parent = store.create(draft("root prompt", &[])).expect("parent");
    store
        .create(RecordDraft {
            text: "variant".to_string(),
            parent_id: Some(parent.id.clone()),
            ..RecordDraft::default()
        })
        .expect("child");

    assert_eq!(store.check_outdated().expect("check"), Vec::new());
}

#[test]
fn outdated_fires_only_on_a_same_id_overwrite() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let parent = store.create(draft("root prompt", &[])).expect("parent");
    let child = store
        .create(RecordDraft {
            text: "variant".to_string(),
            parent_id: Some(parent.id.clone()),
            ..RecordDraft::default()
        })
        .expect("child");

    // A replacement saved under a fresh id leaves the child untouched;
    // it still points at the original parent.
    store.create(draft("root prompt, revised", &[])).expect("replacement");
    assert_eq!(store.check_outdated().expect("check"), Vec::new());

    // Overwriting the parent in place under its own id is the one event
    // the timestamp heuristic reports.
    let mut stale_parent = parent.clone();
    stale_parent.created_at = child.created_at + Duration::seconds(60);
    overwrite_record(&store, &stale_parent);

    let entries = store.check_outdated().expect("check");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].record.id, child.id);
    assert_eq!(entries[0].parent.id, parent.id);
    assert!(entries[0].reason.contains(&parent.id));
}

#[test]
fn outdated_skips_dangling_parents() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let orphan = PromptRecord {
        id: "orphan".to_string(),
        text: "points nowhere".to_string(),
        response: None,
        model: None,
        created_at: Utc::now(),
        parent_id: Some("gone".to_string()),
        branch: "main".to_string(),
        metadata: Default::default(),
        tags: Vec::new(),
    };
    overwrite_record(&store, &orphan);

    assert_eq!(store.check_outdated().expect("check"), Vec::new());
}

#[test]
fn metadata_updates_never_trip_the_outdated_check() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let parent = store.create(draft("root", &[])).expect("parent");
    store
        .create(RecordDraft {
            text: "variant".to_string(),
            parent_id: Some(parent.id.clone()),
            ..RecordDraft::default()
        })
        .expect("child");

    store
        .update_metadata(
            &parent.id,
            vellum_rs_core::MetadataPatch {
                executed: Some(true),
                ..Default::default()
            },
        )
        .expect("update");

    assert_eq!(store.check_outdated().expect("check"), Vec::new());
}

#[test]
fn reindex_restores_tag_lookups_after_index_loss() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let first = store.create(draft("one", &["alpha"])).expect("first");
    let second = store.create(draft("two", &["alpha", "beta"])).expect("second");

    std::fs::remove_file(store.tags().path()).expect("drop index");
    assert_eq!(store.rebuild_tag_index().expect("rebuild"), 2);

    let mut alpha: Vec<String> = store
        .tags()
        .ids_for_tag("alpha")
        .expect("ids")
        .into_iter()
        .collect();
    alpha.sort();
    let mut expected = vec![first.id.clone(), second.id.clone()];
    expected.sort();
    assert_eq!(alpha, expected);
    assert_eq!(store.get(&second.id).expect("get").tags, vec!["alpha", "beta"]);
}
