use nexus_core::db::open_db_in_memory;
use nexus_core::repo::slot_repo::{PARTNERS_SLOT, SELF_PROFILE_SLOT, SETTINGS_SLOT};
use nexus_core::{
    MemorySlotRepository, Partner, SelfProfile, SlotRepository, SqliteSlotRepository,
    TrackerService, DEFAULT_SEED, EMPTY_SEED,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn sample_partners() -> Vec<Partner> {
    vec![
        Partner {
            id: 1_700_000_000_001,
            name: "IB".to_string(),
            smashes: 64,
            rating: 4.2,
            avatar: Some("data:image/png;base64,YWJj".to_string()),
        },
        Partner {
            id: 1_700_000_000_002,
            name: "Random M".to_string(),
            smashes: 16,
            rating: 0.1 + 0.2,
            avatar: None,
        },
        Partner::new(1_700_000_000_003, "Test 4"),
    ]
}

#[test]
fn first_run_uses_seed_store() {
    let service = TrackerService::open(MemorySlotRepository::new(), &DEFAULT_SEED);

    assert_eq!(service.store(), &DEFAULT_SEED.store());
    assert_eq!(service.self_profile(), &SelfProfile::default());
    assert!(service.settings().dark_mode);
}

#[test]
fn malformed_slots_at_startup_fall_back_to_seed() {
    let repo = MemorySlotRepository::new()
        .with_slot(PARTNERS_SLOT, "{oops")
        .with_slot(SELF_PROFILE_SLOT, "42")
        .with_slot(SETTINGS_SLOT, "null");

    let service = TrackerService::open(repo, &DEFAULT_SEED);

    assert_eq!(service.store(), &DEFAULT_SEED.store());
    assert!(service.settings().dark_mode);
    assert!(!service.settings().biometric_auth);
}

#[test]
fn invalid_persisted_partner_falls_back_to_seed() {
    let repo = MemorySlotRepository::new().with_slot(
        PARTNERS_SLOT,
        r#"[{"id":1,"name":"","smashes":0,"rating":0,"avatar":null}]"#,
    );

    let service = TrackerService::open(repo, &DEFAULT_SEED);
    assert_eq!(service.partners(), DEFAULT_SEED.partners().as_slice());
}

#[test]
fn persisted_store_round_trips_through_slots() {
    let conn = open_db_in_memory().unwrap();
    let partners = sample_partners();
    let mut profile = SelfProfile::named("X");
    profile.birthday = "1992-02-29".to_string();
    profile.photo = Some("https://example.invalid/me.png".to_string());

    let repo = SqliteSlotRepository::new(&conn);
    repo.write_slot(PARTNERS_SLOT, &serde_json::to_string(&partners).unwrap())
        .unwrap();
    repo.write_slot(SELF_PROFILE_SLOT, &serde_json::to_string(&profile).unwrap())
        .unwrap();

    let service = TrackerService::open(SqliteSlotRepository::new(&conn), &DEFAULT_SEED);
    assert_eq!(service.partners(), partners.as_slice());
    assert_eq!(service.self_profile(), &profile);
}

fn partner_strategy() -> impl Strategy<Value = Partner> {
    (
        any::<i64>(),
        "\\PC{0,8}[\\p{L}\\p{N}]\\PC{0,8}",
        any::<u32>(),
        0.0f64..=5.0,
        proptest::option::of("\\PC{0,24}"),
    )
        .prop_map(|(id, name, smashes, rating, avatar)| Partner {
            id,
            name,
            smashes,
            rating,
            avatar,
        })
}

fn profile_strategy() -> impl Strategy<Value = SelfProfile> {
    (
        "\\PC{0,16}",
        "([0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01]))?",
        proptest::option::of("\\PC{0,24}"),
    )
        .prop_map(|(name, birthday, photo)| SelfProfile {
            name,
            birthday,
            photo,
        })
}

proptest! {
    #[test]
    fn any_valid_store_round_trips_through_slots(
        partners in proptest::collection::vec(partner_strategy(), 0..8),
        profile in profile_strategy(),
    ) {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        repo.write_slot(PARTNERS_SLOT, &serde_json::to_string(&partners).unwrap())
            .unwrap();
        repo.write_slot(SELF_PROFILE_SLOT, &serde_json::to_string(&profile).unwrap())
            .unwrap();

        let service = TrackerService::open(SqliteSlotRepository::new(&conn), &DEFAULT_SEED);
        prop_assert_eq!(service.partners(), partners.as_slice());
        prop_assert_eq!(service.self_profile(), &profile);
    }
}

#[test]
fn add_partner_appends_one_zeroed_record_and_saves() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TrackerService::open(SqliteSlotRepository::new(&conn), &DEFAULT_SEED);
    let before = service.partners().to_vec();

    let added = service.add_partner("Zed").unwrap();

    assert_eq!(service.partners().len(), before.len() + 1);
    assert_eq!(&service.partners()[..before.len()], before.as_slice());
    let last = service.partners().last().unwrap();
    assert_eq!(last, &added);
    assert_eq!(last.name, "Zed");
    assert_eq!(last.smashes, 0);
    assert_eq!(last.rating, 0.0);
    assert_eq!(last.avatar, None);
    assert!(before.iter().all(|partner| partner.id != added.id));

    let reopened = TrackerService::open(SqliteSlotRepository::new(&conn), &DEFAULT_SEED);
    assert_eq!(reopened.partners(), service.partners());
}

#[test]
fn partner_ids_stay_unique_when_clock_lags_behind_existing_ids() {
    fn stuck_clock() -> i64 {
        3
    }
    let mut service =
        TrackerService::open(MemorySlotRepository::new(), &DEFAULT_SEED).with_clock(stuck_clock);

    for name in ["a", "b", "c"] {
        service.add_partner(name).unwrap();
    }

    let ids = service
        .partners()
        .iter()
        .map(|partner| partner.id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), service.partners().len());
}

#[test]
fn add_partner_after_importing_largest_id_picks_an_unused_id() {
    let mut service = TrackerService::open(MemorySlotRepository::new(), &EMPTY_SEED);
    service
        .import_json(
            r#"{"partners": [
                {"id": 9223372036854775807, "name": "Max", "smashes": 1, "rating": 1.0, "avatar": null}
            ]}"#,
        )
        .unwrap();

    let added = service.add_partner("Zed").unwrap();

    assert_ne!(added.id, i64::MAX);
    let ids = service
        .partners()
        .iter()
        .map(|partner| partner.id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 2);
}

#[test]
fn update_self_profile_replaces_and_saves() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TrackerService::open(SqliteSlotRepository::new(&conn), &EMPTY_SEED);

    let mut profile = SelfProfile::named("Casey");
    profile.birthday = "2000-01-31".to_string();
    service.update_self_profile(profile.clone()).unwrap();

    assert_eq!(service.self_profile(), &profile);
    let reopened = TrackerService::open(SqliteSlotRepository::new(&conn), &EMPTY_SEED);
    assert_eq!(reopened.self_profile(), &profile);
}

#[test]
fn invalid_profile_update_changes_nothing() {
    let mut service = TrackerService::open(MemorySlotRepository::new(), &EMPTY_SEED);

    let mut profile = SelfProfile::named("Casey");
    profile.birthday = "yesterday".to_string();
    assert!(service.update_self_profile(profile).is_err());

    assert_eq!(service.self_profile(), &SelfProfile::default());
    assert_eq!(service.repo().read_slot(SELF_PROFILE_SLOT).unwrap(), None);
}

#[test]
fn failed_saves_keep_in_memory_change_and_are_reported() {
    let repo = MemorySlotRepository::new();
    repo.set_reject_writes(true);
    let mut service = TrackerService::open(repo, &EMPTY_SEED);

    let added = service.add_partner("Zed").unwrap();
    assert_eq!(service.partners(), &[added]);
    assert_eq!(service.unsaved_slots(), vec![PARTNERS_SLOT]);
    assert_eq!(service.repo().read_slot(PARTNERS_SLOT).unwrap(), None);

    service.repo().set_reject_writes(false);
    service.add_partner("Ada").unwrap();
    assert!(service.unsaved_slots().is_empty());
    assert!(service.repo().read_slot(PARTNERS_SLOT).unwrap().is_some());
}

#[test]
fn settings_toggles_persist_in_their_own_slot() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TrackerService::open(SqliteSlotRepository::new(&conn), &EMPTY_SEED);

    service.set_dark_mode(false);
    service.set_biometric_auth(true);

    let reopened = TrackerService::open(SqliteSlotRepository::new(&conn), &EMPTY_SEED);
    assert!(!reopened.settings().dark_mode);
    assert!(reopened.settings().biometric_auth);
    assert_eq!(
        SqliteSlotRepository::new(&conn)
            .read_slot(SETTINGS_SLOT)
            .unwrap()
            .as_deref(),
        Some(r#"{"darkMode":false,"biometricAuth":true}"#)
    );
}
