use geominder_core::db::migrations::latest_version;
use geominder_core::db::open_db_in_memory;
use geominder_core::{ReminderRecord, ReminderStore, RepoError, SqliteReminderStore};
use rusqlite::Connection;

fn sqlite_store() -> SqliteReminderStore {
    SqliteReminderStore::try_new(open_db_in_memory().unwrap()).unwrap()
}

fn full_record(id: &str, title: &str) -> ReminderRecord {
    ReminderRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        description: Some(format!("{title} description")),
        location: Some(format!("{title} location")),
        latitude: Some(37.4219983),
        longitude: Some(-122.084),
    }
}

#[test]
fn save_and_get_by_id_roundtrip_preserves_every_field() {
    let mut store = sqlite_store();
    let record = full_record("id1", "test1");

    store.save(&record).unwrap();

    assert_eq!(store.get_by_id("id1").unwrap(), Some(record));
}

#[test]
fn nullable_fields_roundtrip_as_none() {
    let mut store = sqlite_store();
    let mut record = ReminderRecord::with_id("id1", "title only");
    record.title = None;

    store.save(&record).unwrap();

    let loaded = store.get_by_id("id1").unwrap().unwrap();
    assert_eq!(loaded.title, None);
    assert_eq!(loaded.latitude, None);
    assert_eq!(loaded.longitude, None);
}

#[test]
fn get_by_id_on_unknown_id_is_none() {
    let store = sqlite_store();
    assert_eq!(store.get_by_id("missing").unwrap(), None);
}

#[test]
fn save_is_idempotent() {
    let mut store = sqlite_store();
    let record = full_record("id1", "test1");

    store.save(&record).unwrap();
    let once = store.get_all().unwrap();
    store.save(&record).unwrap();

    assert_eq!(store.get_all().unwrap(), once);
}

#[test]
fn save_overwrites_existing_id_in_place() {
    let mut store = sqlite_store();
    store.save(&full_record("id1", "first")).unwrap();
    store.save(&full_record("id2", "second")).unwrap();

    let mut edited = full_record("id1", "first edited");
    edited.description = None;
    store.save(&edited).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], edited);
    assert_eq!(all[1].id, "id2");
}

#[test]
fn get_all_returns_insertion_order() {
    let mut store = sqlite_store();
    for id in ["c", "a", "b"] {
        store.save(&full_record(id, id)).unwrap();
    }

    let ids = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[test]
fn delete_all_empties_the_store() {
    let mut store = sqlite_store();
    store.save(&full_record("id1", "test1")).unwrap();
    store.save(&full_record("id2", "test2")).unwrap();

    store.delete_all().unwrap();

    assert!(store.get_all().unwrap().is_empty());
    store.delete_all().unwrap();
}

#[test]
fn empty_id_is_rejected_before_sql() {
    let mut store = sqlite_store();
    let err = store
        .save(&ReminderRecord::with_id("", "no id"))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteReminderStore::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_reminders_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteReminderStore::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("reminders"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE reminders (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT,
            description TEXT,
            location TEXT,
            latitude REAL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteReminderStore::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "reminders",
            column: "longitude"
        })
    ));
}

#[test]
fn rows_with_empty_id_are_reported_as_invalid_data() {
    let store = sqlite_store();
    store
        .connection()
        .execute("INSERT INTO reminders (id, title) VALUES ('', 'broken');", [])
        .unwrap();

    let err = store.get_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
