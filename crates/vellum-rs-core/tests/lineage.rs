//! Lineage traversal: chains, trees, dangling parents, cycle defense.

use chrono::Utc;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use vellum_rs_core::{PromptRecord, PromptStore, RecordDraft, StoreError};

fn child_of(store: &PromptStore, parent_id: &str, text: &str) -> PromptRecord {
    store
        .create(RecordDraft {
            text: text.to_string(),
            parent_id: Some(parent_id.to_string()),
            ..RecordDraft::default()
        })
        .expect("create child")
}

/// Write a record file directly, the way on-disk corruption would.
fn plant_record(store: &PromptStore, id: &str, parent_id: Option<&str>) {
    let record = PromptRecord {
        id: id.to_string(),
        text: format!("planted {id}"),
        response: None,
        model: None,
        created_at: Utc::now(),
        parent_id: parent_id.map(|value| value.to_string()),
        branch: "main".to_string(),
        metadata: Default::default(),
        tags: Vec::new(),
    };
    let path = store.root().join("records").join(format!("{id}.json"));
    std::fs::write(path, serde_json::to_string(&record).expect("encode")).expect("write");
}

#[test]
fn ancestors_walk_root_first() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let root = store
        .create(RecordDraft {
            text: "root".to_string(),
            ..RecordDraft::default()
        })
        .expect("root");
    let middle = child_of(&store, &root.id, "middle");
    let leaf = child_of(&store, &middle.id, "leaf");

    let chain = store.ancestors(&leaf.id).expect("ancestors");
    let ids: Vec<&str> = chain.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec![root.id.as_str(), middle.id.as_str()]);

    assert_eq!(store.ancestors(&root.id).expect("root ancestors"), Vec::new());
}

#[test]
fn ancestors_of_unknown_record_is_not_found() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let err = store.ancestors("missing").expect_err("unknown");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn dangling_parent_truncates_ancestry_without_failing() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    plant_record(&store, "orphan", Some("gone"));

    assert_eq!(store.ancestors("orphan").expect("ancestors"), Vec::new());
}

#[test]
fn descendants_build_the_full_tree_oldest_child_first() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let root = store
        .create(RecordDraft {
            text: "root".to_string(),
            ..RecordDraft::default()
        })
        .expect("root");
    let first = child_of(&store, &root.id, "first child");
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = child_of(&store, &root.id, "second child");
    let grandchild = child_of(&store, &first.id, "grandchild");

    let tree = store.descendants(&root.id).expect("descendants");
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].record.id, first.id);
    assert_eq!(tree[1].record.id, second.id);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].record.id, grandchild.id);
    assert_eq!(tree[1].children, Vec::new());
}

#[test]
fn lineage_combines_subject_ancestors_and_descendants() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    let root = store
        .create(RecordDraft {
            text: "root".to_string(),
            ..RecordDraft::default()
        })
        .expect("root");
    let middle = child_of(&store, &root.id, "middle");
    let leaf = child_of(&store, &middle.id, "leaf");

    let lineage = store.lineage(&middle.id).expect("lineage");
    assert_eq!(lineage.record.id, middle.id);
    assert_eq!(lineage.ancestors.len(), 1);
    assert_eq!(lineage.ancestors[0].id, root.id);
    assert_eq!(lineage.descendants.len(), 1);
    assert_eq!(lineage.descendants[0].record.id, leaf.id);

    let err = store.lineage("missing").expect_err("unknown");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn ancestor_cycles_on_disk_are_detected_not_looped() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    plant_record(&store, "a", Some("b"));
    plant_record(&store, "b", Some("a"));

    let err = store.ancestors("a").expect_err("cycle");
    assert!(matches!(err, StoreError::CycleDetected(_)));
}

#[test]
fn descendant_cycles_on_disk_are_detected_not_looped() {
    let temp = tempdir().expect("tempdir");
    let store = PromptStore::open(temp.path()).expect("store");
    plant_record(&store, "a", Some("b"));
    plant_record(&store, "b", Some("a"));

    let err = store.descendants("a").expect_err("cycle");
    assert!(matches!(err, StoreError::CycleDetected(_)));
}
