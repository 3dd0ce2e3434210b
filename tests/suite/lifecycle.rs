//! A registration walked end to end, one session per command.

use charter_core::form::{COMPANY_STEP, ENTITY_STEP, PARTNERS_STEP, SUMMARY_STEP};
use charter_engine::{Restore, View};
use charter_types::{IDENTITY_FIELDS, Role, StepIndex};
use serde_json::json;
use tempfile::tempdir;

use crate::common::{payload, session};

#[test]
fn sarl_registration_reaches_the_summary() {
    let dir = tempdir().unwrap();

    let (mut wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Fresh);
    assert_eq!(wizard.advance(), Ok(ENTITY_STEP));
    wizard.update_step(
        ENTITY_STEP,
        payload(json!({ "entityType": "SARL", "partnerCount": 2 })),
    );
    wizard.sync_participants();
    assert_eq!(wizard.advance(), Ok(COMPANY_STEP));
    drop(wizard);

    // Returning user: data kept, navigation restarts at landing.
    let (mut wizard, restore) = session(dir.path(), "");
    assert_eq!(
        restore,
        Restore::FirstVisit {
            saved_step: COMPANY_STEP
        }
    );
    assert_eq!(wizard.record().current_step(), StepIndex::LANDING);
    assert!(!wizard.markers().nav_guard_ran);
    assert_eq!(wizard.partners_form().participants.len(), 2);
    assert_eq!(wizard.advance(), Ok(ENTITY_STEP));
    assert_eq!(wizard.advance(), Ok(COMPANY_STEP));
    wizard.update_step(
        COMPANY_STEP,
        payload(json!({
            "companyName": "Martin & Fils",
            "activity": "Plumbing and heating installation",
            "premisesType": "commercial-lease",
            "hasEmployees": true
        })),
    );
    assert_eq!(wizard.advance(), Ok(PARTNERS_STEP));
    drop(wizard);

    let (mut wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Resumed);
    assert_eq!(wizard.record().current_step(), PARTNERS_STEP);
    assert!(wizard.markers().nav_guard_ran);
    let blocked = wizard.advance().unwrap_err();
    assert!(!blocked.is_empty());

    for index in 0..2 {
        for field in IDENTITY_FIELDS {
            wizard.set_identity_field(index, field, "filled").unwrap();
        }
    }
    wizard.assign_role(1, Role::Manager).unwrap();
    wizard.set_contribution(0, 600.0, None).unwrap();
    wizard.set_contribution(1, 400.0, None).unwrap();
    assert_eq!(wizard.advance(), Ok(SUMMARY_STEP));
    drop(wizard);

    let (wizard, _) = session(dir.path(), "");
    assert!(matches!(wizard.view(), View::Step(step) if step.id == "summary"));
    let form = wizard.partners_form();
    assert_eq!(form.participants[0].share_percentage().to_string(), "60.00");
    assert_eq!(form.participants[1].role, Role::Manager);
    assert_eq!(form.declared_capital, Some(1000.0));
}

#[test]
fn out_of_range_step_renders_as_landing_after_restore() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    wizard.set_current_step(ENTITY_STEP);
    drop(wizard);

    let (mut wizard, restore) = session(dir.path(), "");
    assert!(matches!(restore, Restore::FirstVisit { .. }));
    wizard.set_current_step(StepIndex::new(12));
    drop(wizard);

    let (wizard, restore) = session(dir.path(), "");
    assert_eq!(restore, Restore::Resumed);
    assert_eq!(wizard.record().current_step(), StepIndex::new(12));
    assert!(matches!(wizard.view(), View::Step(step) if step.id == "landing"));
    assert_eq!(wizard.progress(), None);
}

#[test]
fn debug_entry_only_exposes_developer_reset() {
    let dir = tempdir().unwrap();
    let (wizard, _) = session(dir.path(), "debug=true");
    assert!(wizard.developer_reset_available());
    assert_eq!(wizard.record().current_step(), StepIndex::LANDING);

    let (wizard, _) = session(dir.path(), "lang=fr");
    assert!(!wizard.developer_reset_available());
}
