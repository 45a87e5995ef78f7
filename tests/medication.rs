//! Tests for the medication setup wizard and the daily medication log.
use chrono::{TimeZone, Utc};
use stepwise::catalog::medication::PALETTE;
use stepwise::flows::medication::{
    Frequency, LogSession, LogStatus, LogStep, LogSummary, Medication, MedicationSetup,
    SetupStage, TimeSlot,
};
use stepwise::prelude::*;

fn enter_medication(setup: &mut MedicationSetup, name: &str, times: &[&str]) -> SetupStage {
    setup.set_text(name).expect("Failed to enter name");
    setup.advance().expect("Failed to advance");
    setup.set_text("50mg").expect("Failed to enter dosage");
    setup.advance().expect("Failed to advance");
    setup.select("once").expect("Failed to select frequency");
    setup.advance().expect("Failed to advance");
    for time in times {
        setup.select(time).expect("Failed to select time");
    }
    setup.advance().expect("Failed to finish entry")
}

fn medication(name: &str, times: &[&str]) -> Medication {
    let mut setup = MedicationSetup::standard().expect("Entry flow should compile");
    setup.answer_gate(true).expect("Failed to open entry");
    enter_medication(&mut setup, name, times);
    setup.into_medications().remove(0)
}

#[test]
fn test_declining_the_gate_completes_without_records() {
    let mut setup = MedicationSetup::standard().expect("Entry flow should compile");
    assert_eq!(setup.progress(), Progress::new(1, 6));
    assert_eq!(setup.answer_gate(false), Ok(SetupStage::Complete));
    assert!(setup.medications().is_empty());
    assert_eq!(setup.completion_screen().title, "All Set! ✅");
    assert_eq!(setup.answer_gate(true), Err(FlowError::Finished));
}

#[test]
fn test_add_another_loop_assigns_palette_colors() {
    let mut setup = MedicationSetup::standard().expect("Entry flow should compile");
    setup.answer_gate(true).expect("Failed to open entry");
    assert_eq!(setup.entry_prompt().as_deref(), Some("What's your first medication?"));

    assert_eq!(enter_medication(&mut setup, "Levodopa", &["morning"]), SetupStage::AddAnother);
    assert_eq!(setup.progress(), Progress::new(6, 6));
    assert_eq!(setup.add_another(true), Ok(SetupStage::Entry));
    assert_eq!(setup.entry_prompt().as_deref(), Some("Add another medication"));

    enter_medication(&mut setup, "Rasagiline", &["night", "morning"]);
    assert_eq!(setup.add_another(false), Ok(SetupStage::Complete));
    assert_eq!(setup.completion_screen().subtitle, "2 medications ready to track");

    let medications = setup.into_medications();
    assert_eq!(medications[0].color, PALETTE[0]);
    assert_eq!(medications[1].color, PALETTE[1]);
    assert_eq!(medications[1].times, vec![TimeSlot::Morning, TimeSlot::Night]);
    assert_eq!(medications[1].frequency, Frequency::Once);
    assert_ne!(medications[0].id, medications[1].id);
}

#[test]
fn test_entry_requires_answers() {
    let mut setup = MedicationSetup::standard().expect("Entry flow should compile");
    setup.answer_gate(true).expect("Failed to open entry");
    assert_eq!(
        setup.advance(),
        Err(FlowError::CannotContinue("med_name".to_string()))
    );
    assert!(matches!(
        setup.add_another(true),
        Err(FlowError::InvalidState { operation: "add_another", .. })
    ));
}

#[test]
fn test_back_walks_the_stages_in_reverse() {
    let mut setup = MedicationSetup::standard().expect("Entry flow should compile");
    setup.answer_gate(true).expect("Failed to open entry");
    enter_medication(&mut setup, "Levodopa", &["morning"]);
    assert_eq!(setup.medications().len(), 1);

    // "Add another" re-opens the record on its last question.
    assert_eq!(setup.back(), Ok(Some(SetupStage::Entry)));
    assert!(setup.medications().is_empty());
    let entry = setup.entry().expect("Entry is open");
    assert_eq!(entry.current_step().map(|s| s.id.as_str()), Some("med_times"));
    assert!(entry.answers().contains("med_times", "morning"));
    assert_eq!(setup.progress(), Progress::new(5, 6));

    for _ in 0..3 {
        assert_eq!(setup.back(), Ok(Some(SetupStage::Entry)));
    }
    assert_eq!(setup.back(), Ok(Some(SetupStage::Gate)));
    assert_eq!(setup.back(), Ok(None));
}

#[test]
fn test_log_session_without_medications_is_empty() {
    let mut session = LogSession::new(Vec::new());
    assert!(session.is_empty());
    assert_eq!(session.current_slot(), None);
    assert!(session.medications_for_current().is_empty());
    assert_eq!(
        session.summary(),
        LogSummary {
            taken: 0,
            skipped: 0,
            total: 0,
        }
    );
    assert_eq!(session.progress(), Progress::new(0, 0));
    assert!(session.current_slot_logged());
    assert_eq!(session.next(), Ok(LogStep::Summary));
}

#[test]
fn test_log_session_visits_active_slots_in_order() {
    let levodopa = medication("Levodopa", &["evening", "morning"]);
    let amantadine = medication("Amantadine", &["evening"]);
    let mut session = LogSession::new(vec![levodopa.clone(), amantadine.clone()]);

    assert_eq!(session.active_slots(), [TimeSlot::Morning, TimeSlot::Evening]);
    assert_eq!(session.current_slot(), Some(TimeSlot::Morning));
    assert_eq!(session.back(), Ok(LogStep::ExitRequested));

    session.log(levodopa.id, true).expect("Failed to log");
    assert!(session.current_slot_logged());
    assert!(matches!(
        session.log(amantadine.id, true),
        Err(FlowError::UnknownOption { .. })
    ));

    assert_eq!(session.next(), Ok(LogStep::Slot(TimeSlot::Evening)));
    assert_eq!(session.medications_for_current().len(), 2);
    session.log(levodopa.id, false).expect("Failed to log");
    assert!(!session.current_slot_logged());
    assert!(!session.all_logged());
    session.log(amantadine.id, true).expect("Failed to log");
    assert!(session.all_logged());
    assert_eq!(session.status(levodopa.id, TimeSlot::Evening), LogStatus::Skipped);

    assert_eq!(session.back(), Ok(LogStep::Slot(TimeSlot::Morning)));
    assert_eq!(session.next(), Ok(LogStep::Slot(TimeSlot::Evening)));
    assert_eq!(session.next(), Ok(LogStep::Summary));
    assert!(session.is_finished());
    assert_eq!(session.progress(), Progress::new(2, 2));
    assert_eq!(
        session.summary(),
        LogSummary {
            taken: 2,
            skipped: 1,
            total: 3,
        }
    );
    assert_eq!(session.next(), Err(FlowError::Finished));

    let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
    let logs = session.into_logs(now);
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].scheduled_time, TimeSlot::Morning);
    assert_eq!(logs[0].taken_at, Some(now));
    assert!(logs.iter().all(|log| log.date == now.date_naive()));
    assert_eq!(logs.iter().filter(|log| log.skipped).count(), 1);
}

#[test]
fn test_medication_records_serialize_in_camel_case() {
    let record = medication("Levodopa", &["morning"]);
    let json = serde_json::to_value(&record).expect("Failed to serialize");
    assert_eq!(json["reminderEnabled"], serde_json::json!(true));
    assert_eq!(json["times"], serde_json::json!(["morning"]));
    assert_eq!(json["frequency"], serde_json::json!("once"));
}

#[test]
fn test_reopened_medication_keeps_its_identity() {
    let mut setup = MedicationSetup::standard().expect("Entry flow should compile");
    setup.answer_gate(true).expect("Failed to open entry");
    enter_medication(&mut setup, "Levodopa", &["morning"]);
    let original = setup.medications()[0].clone();

    assert_eq!(setup.back(), Ok(Some(SetupStage::Entry)));
    setup.select("evening").expect("Failed to add a time");
    assert_eq!(setup.advance(), Ok(SetupStage::AddAnother));

    let saved = &setup.medications()[0];
    assert_eq!(saved.id, original.id);
    assert_eq!(saved.color, original.color);
    assert_eq!(saved.times, vec![TimeSlot::Morning, TimeSlot::Evening]);

    // A new record still gets its own identity.
    setup.add_another(true).expect("Failed to open entry");
    enter_medication(&mut setup, "Rasagiline", &["night"]);
    assert_ne!(setup.medications()[1].id, original.id);
}
