use nexus_core::db::{open_db, open_db_in_memory};
use nexus_core::repo::persistence::{load_or_default, save};
use nexus_core::{SlotError, SlotRepository, SqliteSlotRepository};

#[test]
fn read_missing_slot_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert_eq!(repo.read_slot("partners").unwrap(), None);
}

#[test]
fn write_slot_upserts_last_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    repo.write_slot("selfProfile", r#"{"name":"A"}"#).unwrap();
    repo.write_slot("selfProfile", r#"{"name":"B"}"#).unwrap();
    repo.write_slot("partners", "[]").unwrap();

    assert_eq!(
        repo.read_slot("selfProfile").unwrap().as_deref(),
        Some(r#"{"name":"B"}"#)
    );
    assert_eq!(repo.read_slot("partners").unwrap().as_deref(), Some("[]"));
}

#[test]
fn empty_key_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert!(matches!(repo.write_slot("", "[]"), Err(SlotError::EmptyKey)));
}

#[test]
fn slots_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nexus.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        assert!(save(&repo, "numbers", &vec![1_u32, 2, 3]));
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    assert_eq!(load_or_default(&repo, "numbers", Vec::<u32>::new()), vec![1, 2, 3]);
}

#[test]
fn write_failure_on_read_only_database_is_swallowed_by_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nexus.sqlite3");
    drop(open_db(&path).unwrap());

    let conn = rusqlite::Connection::open_with_flags(
        &path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    )
    .unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert!(repo.write_slot("partners", "[]").is_err());
    assert!(!save(&repo, "partners", &Vec::<u32>::new()));
}
