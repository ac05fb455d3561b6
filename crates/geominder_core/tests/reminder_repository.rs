use geominder_core::{
    DataError, InMemoryReminderStore, OperationResult, ReminderDataSource, ReminderRecord,
    ReminderRepository, RepoError, DATA_SOURCE_UNAVAILABLE_MESSAGE, REMINDER_NOT_FOUND_MESSAGE,
};

fn reminder(id: &str, index: u32) -> ReminderRecord {
    ReminderRecord {
        id: id.to_string(),
        title: Some(format!("test{index}")),
        description: Some(format!("testDescription{index}")),
        location: Some(format!("testLocation{index}")),
        latitude: Some(0.0),
        longitude: Some(0.0),
    }
}

fn repositories() -> Vec<(&'static str, ReminderRepository, tempfile::TempDir)> {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = ReminderRepository::open(dir.path().join("reminders.db")).unwrap();
    let memory = ReminderRepository::in_memory().unwrap();
    vec![
        ("sqlite", sqlite, dir),
        ("memory", memory, tempfile::tempdir().unwrap()),
    ]
}

#[test]
fn saved_reminder_is_listed_with_matching_fields() {
    for (name, repo, _dir) in repositories() {
        let record = reminder("id1", 1);
        assert!(repo.save_reminder(record.clone()).is_success(), "{name}");

        assert_eq!(
            repo.get_reminders(),
            OperationResult::Success(vec![record]),
            "{name}"
        );
    }
}

#[test]
fn save_then_get_returns_the_same_record() {
    for (name, repo, _dir) in repositories() {
        let record = reminder("id1", 1);
        repo.save_reminder(record.clone());

        assert_eq!(
            repo.get_reminder("id1"),
            OperationResult::Success(record),
            "{name}"
        );
    }
}

#[test]
fn get_reminder_on_empty_store_is_not_found() {
    for (name, repo, _dir) in repositories() {
        let result = repo.get_reminder("id1");

        assert_eq!(
            result,
            OperationResult::Error(DataError::NotFound("id1".to_string())),
            "{name}"
        );
        assert_eq!(
            result.error().map(DataError::message).as_deref(),
            Some(REMINDER_NOT_FOUND_MESSAGE)
        );
    }
}

#[test]
fn saving_twice_keeps_a_single_copy() {
    for (name, repo, _dir) in repositories() {
        let record = reminder("id1", 1);
        repo.save_reminder(record.clone());
        repo.save_reminder(record.clone());

        assert_eq!(
            repo.get_reminders(),
            OperationResult::Success(vec![record]),
            "{name}"
        );
    }
}

#[test]
fn delete_all_then_list_is_empty() {
    for (name, repo, _dir) in repositories() {
        repo.save_reminder(reminder("id1", 1));
        repo.save_reminder(reminder("id2", 2));

        assert!(repo.delete_all_reminders().is_success(), "{name}");

        assert_eq!(
            repo.get_reminders(),
            OperationResult::Success(Vec::new()),
            "{name}"
        );
    }
}

#[test]
fn forced_failure_applies_to_every_operation() {
    let repo = ReminderRepository::new(InMemoryReminderStore::with_records([reminder("id1", 1)]))
        .unwrap();
    repo.set_return_error(true);

    let unavailable = Some(&DataError::Unavailable);
    assert_eq!(repo.get_reminders().error(), unavailable);
    assert_eq!(repo.get_reminder("id1").error(), unavailable);
    assert_eq!(repo.save_reminder(reminder("id2", 2)).error(), unavailable);
    assert_eq!(repo.delete_all_reminders().error(), unavailable);
    assert_eq!(
        DataError::Unavailable.message(),
        DATA_SOURCE_UNAVAILABLE_MESSAGE
    );

    repo.set_return_error(false);
    assert_eq!(
        repo.get_reminders(),
        OperationResult::Success(vec![reminder("id1", 1)])
    );
}

#[test]
fn sqlite_repository_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.db");

    {
        let repo = ReminderRepository::open(&path).unwrap();
        repo.save_reminder(reminder("id1", 1));
    }

    let reopened = ReminderRepository::open(&path).unwrap();
    assert_eq!(
        reopened.get_reminder("id1"),
        OperationResult::Success(reminder("id1", 1))
    );
}

#[test]
fn open_reports_store_errors_to_the_caller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let result = ReminderRepository::open(&path);
    assert!(matches!(result, Err(RepoError::Db(_))));
}

#[test]
fn storage_failures_surface_as_storage_errors() {
    let repo = ReminderRepository::in_memory().unwrap();

    let result = repo.save_reminder(ReminderRecord::with_id("", "no id"));

    assert!(matches!(result, OperationResult::Error(DataError::Storage(_))));
}
