//! Concurrent invocations sharing one on-disk store.

use pretty_assertions::assert_eq;
use std::thread;
use tempfile::tempdir;
use vellum_rs_core::{PromptStore, RecordDraft};

/// Concurrent creates racing on the shared index must not lose tags:
/// the final index holds the union of everything added. Each thread
/// opens its own store handle, as separate CLI invocations would.
#[test]
fn racing_creates_preserve_every_tag() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().to_path_buf();
    PromptStore::open(&root).expect("seed store");

    let workers: Vec<_> = (0..8)
        .map(|n| {
            let root = root.clone();
            thread::spawn(move || {
                let store = PromptStore::open(&root).expect("open");
                store
                    .create(RecordDraft {
                        text: format!("prompt {n}"),
                        tags: vec![format!("tag-{n}"), "shared".to_string()],
                        ..RecordDraft::default()
                    })
                    .expect("create")
            })
        })
        .collect();

    let created: Vec<_> = workers
        .into_iter()
        .map(|worker| worker.join().expect("join"))
        .collect();

    let store = PromptStore::open(&root).expect("reopen");
    assert_eq!(store.record_count().expect("count"), 8);

    let shared = store.tags().ids_for_tag("shared").expect("shared ids");
    assert_eq!(shared.len(), 8);
    for record in &created {
        assert!(shared.contains(&record.id));
        let tags = store.get(&record.id).expect("get").tags;
        assert!(tags.contains(&"shared".to_string()));
    }
}

/// Readers racing a writer see either the old or the new record state,
/// never a torn file.
#[test]
fn metadata_rewrites_are_atomic_for_readers() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().to_path_buf();
    let store = PromptStore::open(&root).expect("store");
    let record = store
        .create(RecordDraft {
            text: "stable body".to_string(),
            ..RecordDraft::default()
        })
        .expect("create");

    let reader_root = root.clone();
    let reader_id = record.id.clone();
    let reader = thread::spawn(move || {
        let store = PromptStore::open(&reader_root).expect("open");
        for _ in 0..200 {
            let seen = store.get(&reader_id).expect("get");
            assert_eq!(seen.text, "stable body");
        }
    });

    for n in 0..200 {
        store
            .update_metadata(
                &record.id,
                vellum_rs_core::MetadataPatch {
                    executed: Some(n % 2 == 0),
                    ..Default::default()
                },
            )
            .expect("update");
    }
    reader.join().expect("reader");
}
