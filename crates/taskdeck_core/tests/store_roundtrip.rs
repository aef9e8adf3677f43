use taskdeck_core::db::{open_db, open_db_in_memory};
use taskdeck_core::{
    LoadOutcome, Priority, SqliteSlotStore, StateStore, StoreError, TaskDraft, TaskRepository,
};

#[test]
fn absent_slot_loads_as_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let (repo, outcome) = TaskRepository::load(SqliteSlotStore::new(&conn));

    assert!(matches!(outcome, LoadOutcome::Empty));
    assert!(repo.list().is_empty());
}

#[test]
fn saved_collection_round_trips_through_the_slot() {
    let conn = open_db_in_memory().unwrap();

    let saved = {
        let (mut repo, _) = TaskRepository::load(SqliteSlotStore::new(&conn));
        repo.add(TaskDraft {
            text: "Pay rent".to_string(),
            priority: Priority::High,
            tags: vec!["bills".to_string()],
            due_date: Some("2024-01-01".to_string()),
            notes: Some("transfer before the 1st".to_string()),
        })
        .unwrap();
        repo.add(TaskDraft::new("Buy milk")).unwrap();
        repo.list().to_vec()
    };

    let (reloaded, outcome) = TaskRepository::load(SqliteSlotStore::new(&conn));
    assert!(matches!(outcome, LoadOutcome::Loaded(2)));
    assert_eq!(reloaded.list(), saved.as_slice());
}

#[test]
fn non_array_payload_is_corrupt_and_recovers_to_empty() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO slots (key, value) VALUES ('todos', 'not an array');",
        [],
    )
    .unwrap();

    let direct = SqliteSlotStore::new(&conn).load();
    assert!(matches!(direct, Err(StoreError::Corrupt { slot: "todos", .. })));

    let (repo, outcome) = TaskRepository::load(SqliteSlotStore::new(&conn));
    assert!(matches!(
        outcome,
        LoadOutcome::RecoveredFromError(StoreError::Corrupt { .. })
    ));
    assert!(repo.list().is_empty());
}

#[test]
fn duplicate_ids_in_the_payload_are_corrupt() {
    let conn = open_db_in_memory().unwrap();
    let record = r#"{"id":"9b7cdcd4-3f8a-4f5e-9f2d-1c05c5308a41","text":"twice","completed":false,"priority":"medium","tags":[],"createdAt":"2024-01-01T00:00:00Z"}"#;
    let payload = format!("[{record},{record}]");
    conn.execute(
        "INSERT INTO slots (key, value) VALUES ('todos', ?1);",
        [payload],
    )
    .unwrap();

    let loaded = SqliteSlotStore::new(&conn).load();
    assert!(matches!(loaded, Err(StoreError::Corrupt { .. })));
}

#[test]
fn blank_task_text_in_the_payload_is_corrupt() {
    let conn = open_db_in_memory().unwrap();
    let payload = r#"[{"id":"9b7cdcd4-3f8a-4f5e-9f2d-1c05c5308a41","text":"   ","completed":false,"priority":"medium","tags":[],"createdAt":"2024-01-01T00:00:00Z"}]"#;
    conn.execute(
        "INSERT INTO slots (key, value) VALUES ('todos', ?1);",
        [payload],
    )
    .unwrap();

    let loaded = SqliteSlotStore::new(&conn).load();
    assert!(matches!(loaded, Err(StoreError::Corrupt { .. })));
}

#[test]
fn records_missing_defaulted_fields_still_decode() {
    let conn = open_db_in_memory().unwrap();
    let payload = r#"[{"id":"9b7cdcd4-3f8a-4f5e-9f2d-1c05c5308a41","text":"sparse","createdAt":"2024-01-01T00:00:00Z"}]"#;
    conn.execute(
        "INSERT INTO slots (key, value) VALUES ('todos', ?1);",
        [payload],
    )
    .unwrap();

    let loaded = SqliteSlotStore::new(&conn).load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(!loaded[0].completed);
    assert_eq!(loaded[0].priority, Priority::Medium);
    assert!(loaded[0].tags.is_empty());
    assert_eq!(loaded[0].due_date, None);
    assert_eq!(loaded[0].notes, None);
}

#[test]
fn deleting_the_last_task_persists_the_empty_collection() {
    let conn = open_db_in_memory().unwrap();

    {
        let (mut repo, _) = TaskRepository::load(SqliteSlotStore::new(&conn));
        let task = repo.add(TaskDraft::new("only one")).unwrap();
        assert!(repo.remove(task.id));
    }

    let (repo, outcome) = TaskRepository::load(SqliteSlotStore::new(&conn));
    assert!(matches!(outcome, LoadOutcome::Empty));
    assert!(repo.list().is_empty());
}

#[test]
fn file_backed_state_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("taskdeck.db");

    {
        let conn = open_db(&db_path).unwrap();
        let (mut repo, _) = TaskRepository::load(SqliteSlotStore::new(&conn));
        repo.add(TaskDraft::new("survives restarts")).unwrap();
    }

    let conn = open_db(&db_path).unwrap();
    let (repo, outcome) = TaskRepository::load(SqliteSlotStore::new(&conn));
    assert!(matches!(outcome, LoadOutcome::Loaded(1)));
    assert_eq!(repo.list()[0].text, "survives restarts");
}
