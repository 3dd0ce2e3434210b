//! Restore, first-visit and reset behaviour against real files.

use std::fs;

use charter_core::form::{COMPANY_STEP, ENTITY_STEP, PARTNERS_STEP};
use charter_engine::store::keys;
use charter_engine::{KeyValueStore, RecordSnapshot, Restore};
use charter_types::StepIndex;
use serde_json::json;
use tempfile::tempdir;

use crate::common::{payload, session};

#[test]
fn first_restoration_after_reset_lands_on_step_zero() {
    let dir = tempdir().unwrap();

    let (mut wizard, _) = session(dir.path(), "");
    wizard.reset_wizard();
    wizard.update_step(ENTITY_STEP, payload(json!({ "entityType": "EURL" })));
    wizard.set_current_step(PARTNERS_STEP);
    drop(wizard);

    let (wizard, restore) = session(dir.path(), "");
    assert_eq!(
        restore,
        Restore::FirstVisit {
            saved_step: PARTNERS_STEP
        }
    );
    assert_eq!(wizard.record().current_step(), StepIndex::LANDING);
    assert_eq!(
        wizard.record().field(ENTITY_STEP, "entityType"),
        Some(&json!("EURL"))
    );
    assert!(!wizard.markers().nav_guard_ran);
    drop(wizard);

    let (mut wizard, _) = session(dir.path(), "");
    wizard.set_current_step(COMPANY_STEP);
    drop(wizard);
    let (wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Resumed);
    assert_eq!(wizard.record().current_step(), COMPANY_STEP);
}

#[test]
fn returning_user_resumes_data_at_landing() {
    let dir = tempdir().unwrap();

    let (mut wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Fresh);
    assert!(!dir.path().join("initialized.json").exists());
    wizard.update_step(COMPANY_STEP, payload(json!({ "companyName": "Atelier Roux" })));
    wizard.set_current_step(PARTNERS_STEP);
    drop(wizard);

    let (wizard, restore) = session(dir.path(), "");
    assert_eq!(
        restore,
        Restore::FirstVisit {
            saved_step: PARTNERS_STEP
        }
    );
    assert_eq!(wizard.record().current_step(), StepIndex::LANDING);
    assert_eq!(
        wizard.record().field(COMPANY_STEP, "companyName"),
        Some(&json!("Atelier Roux"))
    );
    assert!(dir.path().join("initialized.json").exists());
}

#[test]
fn reset_entry_param_wipes_state_but_keeps_completion() {
    let dir = tempdir().unwrap();

    let (mut wizard, _) = session(dir.path(), "");
    wizard.update_step(ENTITY_STEP, payload(json!({ "entityType": "SA" })));
    wizard.set_item_complete("admin-kbis", true).unwrap();
    drop(wizard);

    let (wizard, restore) = session(dir.path(), "?reset=1");
    assert_eq!(restore, Restore::Reset);
    assert!(wizard.record().payload(ENTITY_STEP).is_none());
    assert!(!wizard.entry().reset_requested());
    assert!(!dir.path().join("registration.json").exists());
    assert!(!dir.path().join("initialized.json").exists());
    assert!(wizard.checklist_completion().is_complete("admin-kbis"));
}

#[test]
fn reset_twice_matches_reset_once() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    wizard.update_step(COMPANY_STEP, payload(json!({ "companyName": "Acme" })));

    wizard.reset_wizard();
    let once = wizard.record().clone();
    let files_once = fs::read_dir(dir.path()).unwrap().count();
    wizard.reset_wizard();

    assert_eq!(wizard.record(), &once);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), files_once);
}

#[test]
fn snapshot_is_a_versioned_envelope() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    wizard.set_current_step(ENTITY_STEP);

    let stored = wizard.store().get(keys::REGISTRATION).unwrap().unwrap();
    assert_eq!(stored["version"], json!(RecordSnapshot::CURRENT_VERSION));
    assert!(stored["savedAt"].is_string());
    assert_eq!(stored["record"]["currentStep"], json!(1));
}

#[test]
fn unreadable_snapshot_starts_fresh() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("registration.json"), "{ truncated").unwrap();
    fs::write(dir.path().join("initialized.json"), "true").unwrap();

    let (mut wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Fresh);

    wizard.set_current_step(ENTITY_STEP);
    let (wizard, _) = session(dir.path(), "");
    assert_eq!(wizard.record().current_step(), ENTITY_STEP);
}

#[test]
fn snapshot_from_another_version_is_ignored() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("registration.json"),
        json!({
            "version": 7,
            "savedAt": "2026-03-01T10:00:00Z",
            "record": { "currentStep": 2 }
        })
        .to_string(),
    )
    .unwrap();

    let (wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Fresh);
    assert_eq!(wizard.record().current_step(), StepIndex::LANDING);
}
