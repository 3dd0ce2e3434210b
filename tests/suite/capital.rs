//! Capital and role rules driven through the wizard.

use charter_core::capital::CapitalError;
use charter_core::form::{ENTITY_STEP, PARTNERS_STEP};
use charter_core::roles::{MissingRequiredRole, missing_required_roles};
use charter_core::steps::StepError;
use charter_engine::{FileStore, Wizard};
use charter_types::{EntityType, IDENTITY_FIELDS, Role};
use serde_json::json;
use tempfile::tempdir;

use crate::common::{payload, session};

fn choose(wizard: &mut Wizard<FileStore>, entity_type: &str, count: u32) {
    wizard.update_step(
        ENTITY_STEP,
        payload(json!({ "entityType": entity_type, "partnerCount": count })),
    );
    wizard.sync_participants();
}

fn identify_everyone(wizard: &mut Wizard<FileStore>) {
    for index in 0..wizard.partners_form().participants.len() {
        for field in IDENTITY_FIELDS {
            wizard.set_identity_field(index, field, "x").unwrap();
        }
    }
}

#[test]
fn sa_with_one_funded_chairman_advances_and_zero_is_blocked() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    choose(&mut wizard, "SA", 2);
    identify_everyone(&mut wizard);
    wizard.set_contribution(0, 40_000.0, None).unwrap();
    wizard.set_contribution(1, 0.0, None).unwrap();

    let form = wizard.partners_form();
    assert_eq!(form.participants[0].share_percentage().to_string(), "100.00");
    assert_eq!(form.participants[1].share_percentage().to_string(), "0.00");

    wizard.set_current_step(PARTNERS_STEP);
    assert!(wizard.advance().is_ok());

    wizard.set_current_step(PARTNERS_STEP);
    wizard.set_contribution(0, 0.0, None).unwrap();
    let errors = wizard.advance().unwrap_err();
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert!(messages.contains(&"minimum capital for an SA is 37000 €".to_string()));
    assert_eq!(wizard.record().current_step(), PARTNERS_STEP);
}

#[test]
fn switching_sasu_to_sca_reports_one_missing_role() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    choose(&mut wizard, "SASU", 1);
    wizard.set_identity_field(0, "firstName", "Claire").unwrap();
    assert_eq!(wizard.partners_form().participants[0].role, Role::President);

    wizard.update_step(ENTITY_STEP, payload(json!({ "entityType": "SCA" })));
    let participants = wizard.partners_form().participants;
    let missing = missing_required_roles(EntityType::Sca, &participants);
    assert_eq!(
        missing,
        vec![MissingRequiredRole {
            role: Role::Manager,
            label: "Managing partner",
        }]
    );
}

#[test]
fn validation_errors_come_in_order() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    choose(&mut wizard, "SAS", 2);
    identify_everyone(&mut wizard);
    wizard.assign_role(0, Role::Partner).unwrap();
    wizard.set_current_step(PARTNERS_STEP);

    let errors = wizard.validate_current();
    let capital: Vec<&CapitalError> = errors
        .iter()
        .filter_map(|error| match error {
            StepError::Capital(inner) => Some(inner),
            _ => None,
        })
        .collect();
    assert!(matches!(capital[0], CapitalError::DistributionIncomplete { .. }));
    assert!(matches!(capital[1], CapitalError::BelowMinimum { .. }));
    assert!(matches!(capital[2], CapitalError::MissingRole(_)));
}

#[test]
fn odd_splits_still_total_one_hundred() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    choose(&mut wizard, "SAS", 3);
    for index in 0..3 {
        wizard.set_contribution(index, 1.0, None).unwrap();
    }

    let shares: Vec<String> = wizard
        .partners_form()
        .participants
        .iter()
        .map(|p| p.share_percentage().to_string())
        .collect();
    assert_eq!(shares, vec!["33.34", "33.33", "33.33"]);
}

#[test]
fn declared_capital_tracks_total_until_confirmed() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    choose(&mut wizard, "SARL", 2);

    wizard.set_contribution(0, 1000.0, None).unwrap();
    assert_eq!(wizard.partners_form().declared_capital, Some(1000.0));

    wizard.confirm_capital();
    wizard.set_contribution(1, 500.0, None).unwrap();
    drop(wizard);

    let (wizard, _) = session(dir.path(), "");
    let form = wizard.partners_form();
    assert!(form.capital_confirmed);
    assert_eq!(form.declared_capital, Some(1000.0));
}
