use taskdeck_core::db::migrations::latest_version;
use taskdeck_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn fresh_database_lands_on_the_latest_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(latest_version() >= 1);
}

#[test]
fn reopening_a_migrated_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("taskdeck.db");

    drop(open_db(&db_path).unwrap());
    let conn = open_db(&db_path).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn databases_from_a_newer_binary_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("taskdeck.db");

    {
        let conn = open_db(&db_path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let error = open_db(&db_path).expect_err("newer schema must be rejected");
    assert!(matches!(
        error,
        DbError::UnsupportedSchemaVersion {
            db_version: 99,
            ..
        }
    ));
}
