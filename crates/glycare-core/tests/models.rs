use glycare_core::context::RequestContext;
use glycare_core::models::adherence::AdherenceRatio;
use glycare_core::models::dose::DoseEvent;
use glycare_core::models::frequency::Frequency;
use glycare_core::models::medication::Medication;
use jiff::civil::{date, datetime};
use uuid::Uuid;

fn metformin() -> Medication {
    Medication {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        name: "Metformin".to_string(),
        dose: "500mg".to_string(),
        frequency: Frequency::TwiceDaily,
        start_date: date(2024, 1, 1),
        end_date: Some(date(2024, 1, 31)),
        instructions: None,
    }
}

#[test]
fn frequency_parses_canonical_names_case_insensitively() {
    assert_eq!(Frequency::parse("ONCE_DAILY"), Frequency::OnceDaily);
    assert_eq!(Frequency::parse("twice_daily"), Frequency::TwiceDaily);
    assert_eq!(Frequency::parse(" every-other-day "), Frequency::EveryOtherDay);
    assert_eq!(Frequency::parse("Every 6h"), Frequency::Every6h);
}

#[test]
fn unknown_frequency_is_kept_verbatim() {
    let parsed = Frequency::parse("four times a fortnight");
    assert_eq!(
        parsed,
        Frequency::Unrecognized("four times a fortnight".to_string())
    );
    assert!(!parsed.is_recognized());
    assert_eq!(parsed.to_string(), "four times a fortnight");
}

#[test]
fn frequency_serializes_as_canonical_name() {
    let json = serde_json::to_string(&Frequency::Every8h).unwrap();
    assert_eq!(json, "\"EVERY_8H\"");

    let back: Frequency = serde_json::from_str("\"weekly\"").unwrap();
    assert_eq!(back, Frequency::Weekly);
}

#[test]
fn every_known_frequency_round_trips_through_its_name() {
    for frequency in Frequency::KNOWN {
        assert_eq!(Frequency::parse(frequency.as_str()), frequency);
    }
}

#[test]
fn adherence_ratio_rejects_out_of_range_values() {
    assert!(AdherenceRatio::new(1.2).is_err());
    assert!(AdherenceRatio::new(-0.1).is_err());
    assert!(AdherenceRatio::new(f64::NAN).is_err());
    assert_eq!(AdherenceRatio::new(0.25).unwrap().value(), 0.25);

    let parsed: Result<AdherenceRatio, _> = serde_json::from_str("1.5");
    assert!(parsed.is_err());
}

#[test]
fn adherence_ratio_from_counts_is_vacuously_full() {
    assert_eq!(AdherenceRatio::from_counts(0, 0), AdherenceRatio::FULL);
    assert_eq!(AdherenceRatio::from_counts(1, 4).value(), 0.25);
    assert_eq!(AdherenceRatio::from_counts(3, 4).to_string(), "75%");
}

#[test]
fn schedule_changed_ignores_cosmetic_fields() {
    let original = metformin();

    let mut renamed = original.clone();
    renamed.name = "Glucophage".to_string();
    renamed.instructions = Some("with food".to_string());
    assert!(!original.schedule_changed(&renamed));

    let mut extended = original.clone();
    extended.end_date = Some(date(2024, 2, 29));
    assert!(original.schedule_changed(&extended));

    let mut refreq = original.clone();
    refreq.frequency = Frequency::OnceDaily;
    assert!(original.schedule_changed(&refreq));
}

#[test]
fn dose_ids_are_stable_per_medication_and_time() {
    let med = metformin();
    let at = datetime(2024, 1, 1, 9, 0, 0, 0);

    let a = DoseEvent::scheduled(med.id, at);
    let b = DoseEvent::scheduled(med.id, at);
    let c = DoseEvent::scheduled(med.id, datetime(2024, 1, 1, 21, 0, 0, 0));

    assert_eq!(a.id, b.id);
    assert_ne!(a.id, c.id);
    assert!(!a.taken);
    assert!(a.is_due(at));
    assert!(!c.is_due(at));
}

#[test]
fn patients_only_access_their_own_records() {
    let now = datetime(2024, 1, 2, 8, 0, 0, 0);
    let patient = Uuid::new_v4();
    let other = Uuid::new_v4();

    let ctx = RequestContext::patient(patient, now);
    assert!(ctx.can_access(patient));
    assert!(!ctx.can_access(other));
    assert!(!ctx.is_clinician());
    assert_eq!(ctx.today(), date(2024, 1, 2));

    let clinician = RequestContext::clinician(Uuid::new_v4(), now);
    assert!(clinician.can_access(other));
}

#[test]
fn medication_label_includes_strength() {
    let mut med = metformin();
    assert_eq!(med.label(), "Metformin 500mg");
    med.dose = "  ".to_string();
    assert_eq!(med.label(), "Metformin");
}
