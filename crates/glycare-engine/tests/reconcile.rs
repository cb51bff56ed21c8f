use std::sync::Arc;

use glycare_core::context::RequestContext;
use glycare_core::models::dose::DoseEvent;
use glycare_core::models::frequency::Frequency;
use glycare_core::models::medication::Medication;
use glycare_engine::store::BoxFuture;
use glycare_engine::{
    Engine, EngineConfig, EngineError, LogStore, MemoryStore, ReconcilePolicy, StoreError,
};
use jiff::civil::{DateTime, date, datetime};
use uuid::Uuid;

fn now() -> DateTime {
    datetime(2024, 1, 3, 12, 0, 0, 0)
}

fn clinician() -> RequestContext {
    RequestContext::clinician(Uuid::new_v4(), now())
}

fn engine(store: &Arc<MemoryStore>, config: EngineConfig) -> Engine {
    Engine::new(store.clone(), store.clone(), store.clone(), config)
}

fn twice_daily() -> Medication {
    Medication {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        name: "Metformin".to_string(),
        dose: "500mg".to_string(),
        frequency: Frequency::TwiceDaily,
        start_date: date(2024, 1, 1),
        end_date: Some(date(2024, 1, 5)),
        instructions: None,
    }
}

async fn timestamps(store: &MemoryStore, medication_id: Uuid) -> Vec<DateTime> {
    store
        .list_by_medication(medication_id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.timestamp)
        .collect()
}

async fn setup(config: EngineConfig) -> (Arc<MemoryStore>, Engine, Medication, Vec<DoseEvent>) {
    let store = Arc::new(MemoryStore::new());
    let engine = engine(&store, config);
    let med = twice_daily();
    store.insert_medication(med.clone()).await;
    let events = engine.prescribe(&clinician(), &med).await.unwrap();
    (store, engine, med, events)
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let (store, engine, med, _) = setup(EngineConfig::default()).await;
    let ctx = clinician();

    let first = engine
        .reconcile(&ctx, med.id, date(2024, 1, 3), ReconcilePolicy::DeleteAll)
        .await
        .unwrap();
    let after_first = timestamps(&store, med.id).await;

    let second = engine
        .reconcile(&ctx, med.id, date(2024, 1, 3), ReconcilePolicy::DeleteAll)
        .await
        .unwrap();
    let after_second = timestamps(&store, med.id).await;

    assert_eq!(after_first, after_second);
    assert_eq!(after_first.len(), 10);
    assert_eq!(first.deleted, 6);
    assert_eq!(first.inserted, 6);
    assert_eq!(second, first);
}

#[tokio::test]
async fn extending_the_end_date_adds_future_doses_and_keeps_history() {
    let (store, engine, med, events) = setup(EngineConfig::default()).await;
    let ctx = clinician();

    engine
        .record_dose(&ctx, med.id, events[0].id, true)
        .await
        .unwrap();

    let mut extended = med.clone();
    extended.end_date = Some(date(2024, 1, 7));
    let outcome = engine
        .update_medication(&ctx, extended, date(2024, 1, 3))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.deleted, 6);
    assert_eq!(outcome.inserted, 10);

    let stored = store.list_by_medication(med.id).await.unwrap();
    assert_eq!(stored.len(), 14);
    assert!(stored[0].taken, "history before the effective date is untouched");
    assert_eq!(
        stored.last().unwrap().timestamp,
        datetime(2024, 1, 7, 21, 0, 0, 0)
    );
}

#[tokio::test]
async fn frequency_change_regenerates_with_new_slots() {
    let (store, engine, med, _) = setup(EngineConfig::default()).await;

    let mut changed = med.clone();
    changed.frequency = Frequency::OnceDaily;
    engine
        .update_medication(&clinician(), changed, date(2024, 1, 4))
        .await
        .unwrap();

    assert_eq!(
        timestamps(&store, med.id).await,
        vec![
            datetime(2024, 1, 1, 9, 0, 0, 0),
            datetime(2024, 1, 1, 21, 0, 0, 0),
            datetime(2024, 1, 2, 9, 0, 0, 0),
            datetime(2024, 1, 2, 21, 0, 0, 0),
            datetime(2024, 1, 3, 9, 0, 0, 0),
            datetime(2024, 1, 3, 21, 0, 0, 0),
            datetime(2024, 1, 4, 8, 0, 0, 0),
            datetime(2024, 1, 5, 8, 0, 0, 0),
        ]
    );
}

#[tokio::test]
async fn cosmetic_edits_do_not_touch_the_schedule() {
    let (store, engine, med, _) = setup(EngineConfig::default()).await;

    let mut renamed = med.clone();
    renamed.instructions = Some("take with food".to_string());
    let outcome = engine
        .update_medication(&clinician(), renamed, date(2024, 1, 3))
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert_eq!(store.dose_count(med.id).await, 10);
}

#[tokio::test]
async fn delete_all_drops_doses_taken_on_the_effective_date() {
    let (store, engine, med, events) = setup(EngineConfig::default()).await;
    let ctx = clinician();

    // Jan 3 09:00 taken, then the schedule is reconciled from Jan 3.
    let jan3_morning = &events[4];
    engine
        .record_dose(&ctx, med.id, jan3_morning.id, true)
        .await
        .unwrap();

    engine
        .reconcile(&ctx, med.id, date(2024, 1, 3), ReconcilePolicy::DeleteAll)
        .await
        .unwrap();

    let stored = store.list_by_medication(med.id).await.unwrap();
    let regenerated = stored
        .iter()
        .find(|e| e.timestamp == jan3_morning.timestamp)
        .unwrap();
    assert!(!regenerated.taken);
}

#[tokio::test]
async fn preserve_taken_keeps_taken_doses_without_duplicates() {
    let (store, engine, med, events) = setup(EngineConfig::default()).await;
    let ctx = clinician();

    let jan3_morning = &events[4];
    engine
        .record_dose(&ctx, med.id, jan3_morning.id, true)
        .await
        .unwrap();

    let outcome = engine
        .reconcile(&ctx, med.id, date(2024, 1, 3), ReconcilePolicy::PreserveTaken)
        .await
        .unwrap();
    assert_eq!(outcome.deleted, 5);
    assert_eq!(outcome.retained, 1);
    assert_eq!(outcome.inserted, 5);

    let stored = store.list_by_medication(med.id).await.unwrap();
    assert_eq!(stored.len(), 10);
    let kept = stored
        .iter()
        .find(|e| e.timestamp == jan3_morning.timestamp)
        .unwrap();
    assert!(kept.taken);

    let again = engine
        .reconcile(&ctx, med.id, date(2024, 1, 3), ReconcilePolicy::PreserveTaken)
        .await
        .unwrap();
    assert_eq!(again, outcome);
}

#[tokio::test]
async fn configured_policy_applies_to_edits() {
    let config = EngineConfig {
        reconcile_policy: ReconcilePolicy::PreserveTaken,
        ..EngineConfig::default()
    };
    let (store, engine, med, events) = setup(config).await;
    let ctx = clinician();

    engine
        .record_dose(&ctx, med.id, events[5].id, true)
        .await
        .unwrap();

    let mut shortened = med.clone();
    shortened.end_date = Some(date(2024, 1, 4));
    let outcome = engine
        .update_medication(&ctx, shortened, date(2024, 1, 3))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.retained, 1);
    assert_eq!(store.dose_count(med.id).await, 8);
}

#[tokio::test]
async fn effective_date_after_the_end_only_deletes() {
    let (store, engine, med, _) = setup(EngineConfig::default()).await;

    let outcome = engine
        .reconcile(
            &clinician(),
            med.id,
            date(2024, 2, 1),
            ReconcilePolicy::DeleteAll,
        )
        .await
        .unwrap();
    assert_eq!(outcome.deleted, 0);
    assert_eq!(outcome.inserted, 0);
    assert_eq!(store.dose_count(med.id).await, 10);
}

#[tokio::test]
async fn unschedulable_edit_leaves_the_log_untouched() {
    let (store, engine, med, _) = setup(EngineConfig::default()).await;

    let mut open_ended = med.clone();
    open_ended.end_date = None;
    let err = engine
        .update_medication(&clinician(), open_ended, date(2024, 1, 3))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Schedule(_)));
    assert_eq!(store.dose_count(med.id).await, 10);
}

/// Log store whose batch inserts always fail.
struct FailingInserts(Arc<MemoryStore>);

impl LogStore for FailingInserts {
    fn list_by_medication(
        &self,
        medication_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<DoseEvent>, StoreError>> {
        self.0.list_by_medication(medication_id)
    }

    fn list_due_by(
        &self,
        medication_id: Uuid,
        as_of: DateTime,
    ) -> BoxFuture<'_, Result<Vec<DoseEvent>, StoreError>> {
        self.0.list_due_by(medication_id, as_of)
    }

    fn delete_from(
        &self,
        medication_id: Uuid,
        from: DateTime,
    ) -> BoxFuture<'_, Result<usize, StoreError>> {
        self.0.delete_from(medication_id, from)
    }

    fn delete_untaken_from(
        &self,
        medication_id: Uuid,
        from: DateTime,
    ) -> BoxFuture<'_, Result<usize, StoreError>> {
        self.0.delete_untaken_from(medication_id, from)
    }

    fn insert_batch(&self, _events: Vec<DoseEvent>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async { Err(StoreError::Backend("disk full".to_string())) })
    }

    fn mark_taken(
        &self,
        medication_id: Uuid,
        event_id: Uuid,
        taken: bool,
    ) -> BoxFuture<'_, Result<DoseEvent, StoreError>> {
        self.0.mark_taken(medication_id, event_id, taken)
    }
}

#[tokio::test]
async fn failed_insert_after_delete_is_a_partial_reconcile() {
    let (store, _, med, _) = setup(EngineConfig::default()).await;
    let failing = Engine::new(
        store.clone(),
        Arc::new(FailingInserts(store.clone())),
        store.clone(),
        EngineConfig::default(),
    );

    let err = failing
        .reconcile(&clinician(), med.id, date(2024, 1, 3), ReconcilePolicy::DeleteAll)
        .await
        .unwrap_err();

    match err {
        EngineError::PartialReconcile {
            medication_id,
            deleted,
            source: StoreError::Backend(msg),
        } => {
            assert_eq!(medication_id, med.id);
            assert_eq!(deleted, 6);
            assert_eq!(msg, "disk full");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.dose_count(med.id).await, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reconcile_and_dose_recording_serialize() {
    let (store, engine, med, events) = setup(EngineConfig::default()).await;
    let engine = Arc::new(engine);
    let ctx = clinician();
    let medication_id = med.id;
    let effective_from = date(2024, 1, 3);

    // Every dose from the effective date on is both rewritten by the
    // reconciliations and marked taken in between them.
    let future: Vec<DoseEvent> = events
        .iter()
        .filter(|e| e.timestamp >= effective_from.to_datetime(jiff::civil::Time::midnight()))
        .cloned()
        .collect();
    assert_eq!(future.len(), 6);

    let mut handles = Vec::new();
    for (i, event) in future.iter().enumerate() {
        let event_id = event.id;
        let reconcile_engine = engine.clone();
        let reconcile_ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            reconcile_engine
                .reconcile(&reconcile_ctx, medication_id, effective_from, ReconcilePolicy::PreserveTaken)
                .await
                .map(|_| ())
        }));
        let engine = engine.clone();
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                tokio::task::yield_now().await;
            }
            engine
                .record_dose(&ctx, medication_id, event_id, true)
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let log = store.list_by_medication(med.id).await.unwrap();
    assert_eq!(log.len(), 10);
    let taken: Vec<DateTime> = log.iter().filter(|e| e.taken).map(|e| e.timestamp).collect();
    let expected: Vec<DateTime> = future.iter().map(|e| e.timestamp).collect();
    assert_eq!(taken, expected);
}
