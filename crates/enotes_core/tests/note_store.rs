use chrono::Duration;
use enotes_core::{
    FixedClock, MemoryBlobStore, Note, NoteId, NoteStore, StoreConfig,
};
use std::rc::Rc;

fn new_store() -> (NoteStore<MemoryBlobStore>, Rc<FixedClock>) {
    let clock = Rc::new(FixedClock::at_millis(1_700_000_000_000).unwrap());
    let store = NoteStore::load_with(
        MemoryBlobStore::new(),
        &StoreConfig::default(),
        Box::new(Rc::clone(&clock)),
    )
    .unwrap();
    (store, clock)
}

fn contents(notes: &[Note]) -> Vec<&str> {
    notes.iter().map(Note::content).collect()
}

#[test]
fn create_trims_content_and_prepends() {
    let (mut store, clock) = new_store();
    let first = store.create("  first  ").unwrap().unwrap();
    clock.advance(Duration::milliseconds(5));
    let second = store.create("second\n").unwrap().unwrap();

    assert_eq!(first.content(), "first");
    assert_eq!(second.content(), "second");
    assert!(second.id() > first.id());
    assert_eq!(store.notes()[0], second);
    assert_eq!(contents(store.notes()), vec!["second", "first"]);
}

#[test]
fn create_with_blank_content_is_a_no_op() {
    let (mut store, _clock) = new_store();
    store.create("kept").unwrap();
    let writes = store.blob_store().write_count();

    assert_eq!(store.create("").unwrap(), None);
    assert_eq!(store.create("   ").unwrap(), None);
    assert_eq!(store.create("\n\t").unwrap(), None);
    assert_eq!(store.len(), 1);
    assert_eq!(store.blob_store().write_count(), writes);
}

#[test]
fn create_in_tight_loop_yields_unique_ids() {
    let (mut store, _clock) = new_store();
    for idx in 0..100 {
        store.create(&format!("note {idx}")).unwrap();
    }
    let mut ids = store.notes().iter().map(Note::id).collect::<Vec<_>>();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}

#[test]
fn update_changes_only_content() {
    let (mut store, clock) = new_store();
    let note = store.create("draft").unwrap().unwrap();
    clock.advance(Duration::hours(1));

    assert!(store.update(note.id(), "  final  ").unwrap());
    let updated = store.get(note.id()).unwrap();
    assert_eq!(updated.content(), "final");
    assert_eq!(updated.id(), note.id());
    assert_eq!(updated.created_at(), note.created_at());
}

#[test]
fn update_unknown_id_returns_false_and_keeps_collection() {
    let (mut store, _clock) = new_store();
    store.create("only").unwrap();
    let before = store.notes().to_vec();

    assert!(!store.update(NoteId::new(42), "other").unwrap());
    assert_eq!(store.notes(), before.as_slice());
}

#[test]
fn update_with_blank_content_is_rejected() {
    let (mut store, _clock) = new_store();
    let note = store.create("keep me").unwrap().unwrap();

    assert!(!store.update(note.id(), "   ").unwrap());
    assert_eq!(store.get(note.id()).unwrap().content(), "keep me");
}

#[test]
fn update_keeps_position_in_collection() {
    let (mut store, clock) = new_store();
    let older = store.create("older").unwrap().unwrap();
    clock.advance(Duration::seconds(1));
    store.create("newer").unwrap();

    store.update(older.id(), "older, edited").unwrap();
    assert_eq!(contents(store.notes()), vec!["newer", "older, edited"]);
}

#[test]
fn delete_removes_exactly_one_and_is_idempotent() {
    let (mut store, clock) = new_store();
    let a = store.create("a").unwrap().unwrap();
    clock.advance(Duration::milliseconds(1));
    store.create("b").unwrap();

    assert!(store.delete(a.id()).unwrap());
    assert_eq!(contents(store.notes()), vec!["b"]);

    assert!(!store.delete(a.id()).unwrap());
    assert_eq!(contents(store.notes()), vec!["b"]);
}

#[test]
fn search_empty_query_returns_full_collection_in_order() {
    let (mut store, clock) = new_store();
    for content in ["one", "two", "three"] {
        store.create(content).unwrap();
        clock.advance(Duration::milliseconds(1));
    }

    let all = store.search("").collect::<Vec<_>>();
    assert_eq!(all.len(), 3);
    assert!(all.iter().zip(store.notes()).all(|(found, note)| *found == note));
}

#[test]
fn search_is_case_insensitive_and_order_preserving() {
    let (mut store, clock) = new_store();
    for content in ["Dog food", "cat toy", "walk the DOG", "hotdog"] {
        store.create(content).unwrap();
        clock.advance(Duration::milliseconds(1));
    }

    let found = store
        .search("dOg")
        .map(Note::content)
        .collect::<Vec<_>>();
    assert_eq!(found, vec!["hotdog", "walk the DOG", "Dog food"]);
    assert_eq!(store.search("bird").count(), 0);
    assert_eq!(store.len(), 4);
}

#[test]
fn scenario_create_search_delete() {
    let (mut store, clock) = new_store();
    assert!(store.is_empty());

    let milk = store.create("Buy milk").unwrap().unwrap();
    assert_eq!(contents(store.notes()), vec!["Buy milk"]);

    clock.advance(Duration::seconds(3));
    store.create("Walk dog").unwrap();
    assert_eq!(contents(store.notes()), vec!["Walk dog", "Buy milk"]);

    let found = store
        .search("dog")
        .map(Note::content)
        .collect::<Vec<_>>();
    assert_eq!(found, vec!["Walk dog"]);

    assert!(store.delete(milk.id()).unwrap());
    assert_eq!(contents(store.notes()), vec!["Walk dog"]);
}
