mod common;

use common::RecordingStore;
use emotodo_core::calendar::{format_date, parse_date, today};
use emotodo_core::{
    parse_energy_level, DailyRecord, NewRecord, RecordLedger, RecordPatch, RecordServiceError,
    RecordId, RecordStatus, RecordValidationError, Storage, TaskId, RECORDS_KEY,
};
use std::sync::Arc;

fn loaded_ledger(store: &RecordingStore) -> RecordLedger<&RecordingStore> {
    let mut ledger = RecordLedger::new(Storage::new(store));
    ledger.load_records().unwrap();
    ledger
}

fn record_on(task_id: &TaskId, date: &str, status: RecordStatus) -> NewRecord {
    NewRecord::new(task_id.clone(), parse_date(date).unwrap(), status)
}

#[test]
fn empty_storage_loads_empty_ledger() {
    let store = RecordingStore::new();
    let ledger = loaded_ledger(&store);

    assert!(ledger.records().is_empty());
    assert!(!ledger.is_loading());
    assert_eq!(store.writes.get(), 0);
}

#[test]
fn load_failure_propagates_and_resets_loading_flag() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    ledger
        .add_record(record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Completed))
        .unwrap();

    store.fail_reads.set(true);
    let err = ledger.load_records().unwrap_err();

    assert!(err.to_string().starts_with("Failed to get records"));
    assert!(!ledger.is_loading());
    assert_eq!(ledger.records().len(), 1);
}

#[test]
fn every_valid_energy_level_round_trips() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let task_id = TaskId::generate();

    for level in 1..=5u8 {
        let mut input = record_on(&task_id, "2026-02-08", RecordStatus::Completed);
        input.energy_level = Some(level);
        let created = ledger.add_record(input).unwrap();
        assert_eq!(created.energy_level, Some(level));
    }

    let reloaded = loaded_ledger(&store);
    let levels: Vec<Option<u8>> = reloaded
        .records()
        .iter()
        .map(|record| record.energy_level)
        .collect();
    assert_eq!(levels, vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
}

#[test]
fn out_of_range_energy_level_is_rejected_without_write() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);

    for level in [0u8, 6] {
        let mut input = record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Completed);
        input.energy_level = Some(level);
        let err = ledger.add_record(input).unwrap_err();
        assert!(matches!(
            err,
            RecordServiceError::Validation(RecordValidationError::EnergyLevelOutOfRange(got)) if got == level
        ));
        assert!(err.to_string().contains("between 1 and 5"));
    }

    assert_eq!(store.writes.get(), 0);
    assert!(ledger.records().is_empty());
}

#[test]
fn fractional_energy_level_is_rejected_at_the_boundary() {
    assert_eq!(parse_energy_level(3.0), Ok(3));
    assert!(matches!(
        parse_energy_level(2.5),
        Err(RecordValidationError::EnergyLevelNotInteger(_))
    ));
    assert!(parse_energy_level(0.0).is_err());
    assert!(parse_energy_level(6.0).is_err());
}

#[test]
fn add_write_failure_leaves_ledger_unchanged() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let kept = ledger
        .add_record(record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Partial))
        .unwrap();

    store.fail_writes.set(true);
    let err = ledger
        .add_record(record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Completed))
        .unwrap_err();

    assert!(matches!(err, RecordServiceError::Storage(_)));
    assert!(err.to_string().starts_with("Failed to save records"));
    assert_eq!(ledger.records().len(), 1);
    assert!(Arc::ptr_eq(&ledger.records()[0], &kept));
}

#[test]
fn update_merges_fields_and_keeps_identity_fields() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let mut input = record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Partial);
    input.emotion = Some("tired".to_string());
    input.note = Some("short walk".to_string());
    let original = ledger.add_record(input).unwrap();

    let patch = RecordPatch {
        status: Some(RecordStatus::Completed),
        energy_level: Some(Some(4)),
        note: Some(None),
        ..RecordPatch::default()
    };
    ledger.update_record(&original.id, &patch).unwrap();

    let updated = ledger.get_record(&original.id).unwrap();
    assert_eq!(updated.status, RecordStatus::Completed);
    assert_eq!(updated.energy_level, Some(4));
    assert_eq!(updated.emotion.as_deref(), Some("tired"));
    assert_eq!(updated.note, None);
    assert_eq!(updated.recorded_at, original.recorded_at);
    assert_eq!(updated.task_id, original.task_id);
    assert_eq!(original.status, RecordStatus::Partial);

    let persisted: Vec<DailyRecord> = ledger.storage().get_records().unwrap().unwrap();
    assert_eq!(persisted[0].status, RecordStatus::Completed);
}

#[test]
fn invalid_update_is_rejected_before_any_write() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let original = ledger
        .add_record(record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Completed))
        .unwrap();
    let writes = store.writes.get();

    let patch = RecordPatch {
        energy_level: Some(Some(9)),
        ..RecordPatch::default()
    };

    assert!(ledger.update_record(&original.id, &patch).is_err());
    assert!(ledger.update_record(&RecordId::new("missing"), &patch).is_err());
    assert_eq!(store.writes.get(), writes);
    assert_eq!(ledger.get_record(&original.id).unwrap().energy_level, None);
}

#[test]
fn update_of_unknown_id_is_a_silent_no_op() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let writes = store.writes.get();

    ledger
        .update_record(&RecordId::new("missing"), &RecordPatch::default())
        .unwrap();

    assert_eq!(store.writes.get(), writes);
}

#[test]
fn update_write_failure_keeps_previous_record() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let original = ledger
        .add_record(record_on(&TaskId::generate(), "2026-02-08", RecordStatus::Postponed))
        .unwrap();

    store.fail_writes.set(true);
    let patch = RecordPatch {
        status: Some(RecordStatus::Completed),
        ..RecordPatch::default()
    };
    assert!(ledger.update_record(&original.id, &patch).is_err());

    assert!(Arc::ptr_eq(&ledger.get_record(&original.id).unwrap(), &original));
}

#[test]
fn records_for_date_filter_by_calendar_date() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let task_id = TaskId::generate();
    ledger
        .add_record(record_on(&task_id, "2026-02-07", RecordStatus::Completed))
        .unwrap();
    let target = ledger
        .add_record(record_on(&task_id, "2026-02-08", RecordStatus::Partial))
        .unwrap();
    ledger
        .add_record(record_on(&task_id, "2026-02-09", RecordStatus::Completed))
        .unwrap();

    let found = ledger.get_records_for_date(parse_date("2026-02-08").unwrap());

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, target.id);
    assert!(ledger
        .get_records_for_date(parse_date("2026-02-10").unwrap())
        .is_empty());
}

#[test]
fn today_queries_use_local_date() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let recorded_task = TaskId::generate();
    let other_task = TaskId::generate();
    let today_record = ledger
        .add_record(NewRecord::new(recorded_task.clone(), today(), RecordStatus::Completed))
        .unwrap();
    ledger
        .add_record(record_on(&other_task, "2020-01-01", RecordStatus::Completed))
        .unwrap();

    assert!(ledger.has_recorded_today(&recorded_task));
    assert!(!ledger.has_recorded_today(&other_task));
    assert_eq!(
        ledger.get_today_record(&recorded_task).unwrap().id,
        today_record.id
    );
}

#[test]
fn duplicates_are_kept_and_first_match_wins() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);
    let task_id = TaskId::generate();
    let first = ledger
        .add_record(record_on(&task_id, "2026-02-08", RecordStatus::Partial))
        .unwrap();
    ledger
        .add_record(record_on(&task_id, "2026-02-08", RecordStatus::Completed))
        .unwrap();

    let date = parse_date("2026-02-08").unwrap();
    assert_eq!(ledger.get_records_for_date(date).len(), 2);
    assert_eq!(ledger.record_for(&task_id, date).unwrap().id, first.id);
    assert_eq!(ledger.get_records_for_task(&task_id).len(), 2);
}

#[test]
fn records_survive_without_their_task() {
    let task_id = TaskId::generate();
    let record = record_on(&task_id, "2026-02-08", RecordStatus::Completed).into_record();
    let store = RecordingStore::with_item(
        RECORDS_KEY,
        &serde_json::to_string(&[record.clone()]).unwrap(),
    );

    let ledger = loaded_ledger(&store);

    assert_eq!(ledger.get_records_for_task(&task_id).len(), 1);
    assert_eq!(*ledger.get_record(&record.id).unwrap(), record);
}

#[test]
fn stored_records_with_opaque_ids_are_queryable() {
    let store = RecordingStore::with_item(
        RECORDS_KEY,
        r#"[
            {"id":"r1","taskId":"t1","date":"2026-02-08","status":"completed",
             "recordedAt":"2026-02-08T09:00:00Z"},
            {"id":"r2","taskId":"t1","date":"2026-02-09","status":"partial",
             "recordedAt":"2026-02-09T09:00:00Z"}
        ]"#,
    );

    let ledger = loaded_ledger(&store);

    let on_first = ledger.get_records_for_date(parse_date("2026-02-08").unwrap());
    assert_eq!(on_first.len(), 1);
    assert_eq!(on_first[0].id, RecordId::new("r1"));
    assert_eq!(on_first[0].task_id.as_str(), "t1");
    assert_eq!(ledger.get_records_for_task(&TaskId::new("t1")).len(), 2);

    let recorded_today = ledger.has_recorded_today(&TaskId::new("t1"));
    let today_str = format_date(today());
    assert_eq!(
        recorded_today,
        today_str == "2026-02-08" || today_str == "2026-02-09"
    );
}

#[test]
fn has_recorded_today_matches_opaque_task_id() {
    let store = RecordingStore::new();
    let mut ledger = loaded_ledger(&store);

    ledger
        .add_record(record_on(&TaskId::new("t1"), "2020-01-01", RecordStatus::Completed))
        .unwrap();
    assert!(!ledger.has_recorded_today(&TaskId::new("t1")));

    ledger
        .add_record(NewRecord::new(TaskId::new("t1"), today(), RecordStatus::Partial))
        .unwrap();
    assert!(ledger.has_recorded_today(&TaskId::new("t1")));
    assert!(!ledger.has_recorded_today(&TaskId::new("t2")));
    assert!(store.raw(RECORDS_KEY).unwrap().contains(r#""taskId":"t1""#));
}
