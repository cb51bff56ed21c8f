use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use glycare_core::context::RequestContext;
use glycare_core::models::adherence::PatientAdherence;
use glycare_core::models::alert::{Alert, RiskStatus};
use glycare_core::models::dose::DoseEvent;
use glycare_engine::{Engine, MemoryStore};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod fixture;

#[derive(Serialize)]
struct Report {
    patient_id: Uuid,
    as_of: jiff::civil::DateTime,
    schedules: Vec<ScheduleSummary>,
    adherence: PatientAdherence,
    risk_status: Option<RiskStatus>,
    alerts: Vec<Alert>,
}

#[derive(Serialize)]
struct ScheduleSummary {
    medication_id: Uuid,
    medication: String,
    frequency: String,
    events: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let fixture_path = env::args()
        .nth(1)
        .ok_or_else(|| eyre::eyre!("usage: glycare <fixture.json>"))?;
    let config_path =
        PathBuf::from(env::var("GLYCARE_CONFIG").unwrap_or_else(|_| "glycare.json".to_string()));

    let config = glycare_engine::config::load_config(&config_path)?;
    let fixture = fixture::load(&fixture_path)?;

    let store = Arc::new(MemoryStore::new());
    let engine = Engine::new(store.clone(), store.clone(), store.clone(), config);
    // The harness acts as the prescribing clinician.
    let ctx = RequestContext::clinician(Uuid::new_v4(), fixture.now);

    let mut schedules = Vec::with_capacity(fixture.medications.len());
    for medication in &fixture.medications {
        store.insert_medication(medication.clone()).await;
        let (events, error) = match engine.prescribe(&ctx, medication).await {
            Ok(events) => (events.len(), None),
            Err(e) => {
                tracing::warn!(medication_id = %medication.id, error = %e, "medication not scheduled");
                (0, Some(e.to_string()))
            }
        };
        schedules.push(ScheduleSummary {
            medication_id: medication.id,
            medication: medication.label(),
            frequency: medication.frequency.to_string(),
            events,
            error,
        });
    }

    for measurement in fixture.measurements {
        store.insert_measurement(measurement).await;
    }

    for dose in &fixture.taken {
        let event_id = DoseEvent::id_for(dose.medication_id, dose.timestamp);
        engine
            .record_dose(&ctx, dose.medication_id, event_id, true)
            .await?;
    }

    let report = Report {
        patient_id: fixture.patient_id,
        as_of: fixture.now,
        schedules,
        adherence: engine
            .patient_adherence(&ctx, fixture.patient_id, fixture.now)
            .await?,
        risk_status: engine.risk_status(&ctx, fixture.patient_id).await?,
        alerts: engine.alerts(&ctx, fixture.patient_id).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
