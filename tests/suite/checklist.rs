//! Checklist generation from the stored profile and durable completion.

use charter_core::form::{COMPANY_STEP, ENTITY_STEP};
use charter_engine::{FileStore, Wizard};
use serde_json::json;
use tempfile::tempdir;

use crate::common::{payload, session};

fn profile(wizard: &mut Wizard<FileStore>, entity_type: &str, activity: &str, premises: &str) {
    wizard.update_step(ENTITY_STEP, payload(json!({ "entityType": entity_type })));
    wizard.update_step(
        COMPANY_STEP,
        payload(json!({
            "companyName": "Test",
            "activity": activity,
            "premisesType": premises,
            "hasEmployees": false
        })),
    );
}

fn outline(wizard: &Wizard<FileStore>) -> String {
    wizard
        .checklist()
        .categories
        .iter()
        .map(|category| {
            let ids: Vec<&str> = category.items.iter().map(|item| item.id).collect();
            format!("{}: {}", category.id, ids.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn construction_sas_in_a_rented_office() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    profile(&mut wizard, "SAS", "Travaux de rénovation", "office-rental");

    insta::assert_snapshot!(outline(&wizard), @r"
    administrative: admin-kbis admin-capital-release admin-registers admin-beneficial-owners
    tax: tax-professional-account tax-vat-regime tax-accountant tax-cfe
    insurance: insurance-professional-liability insurance-legal-protection insurance-premises insurance-directors-liability
    human-resources: hr-officer-coverage hr-complementary-cover hr-unemployment-cover
    business: business-invoicing business-online-presence business-trademark business-network
    specific: specific-construction-decennial specific-construction-qualification
    ");
}

#[test]
fn activity_matching_ignores_case() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    profile(&mut wizard, "EURL", "RETAIL AND CONSULTING", "home");
    let list = wizard.checklist();
    let specific = list.categories.last().unwrap();
    assert_eq!(specific.items.len(), 4);

    profile(&mut wizard, "EURL", "software", "home");
    assert!(
        wizard
            .checklist()
            .categories
            .iter()
            .all(|c| c.id.as_str() != "specific")
    );
}

#[test]
fn completion_survives_regeneration_reset_and_restart() {
    let dir = tempdir().unwrap();
    let (mut wizard, _) = session(dir.path(), "");
    profile(&mut wizard, "SARL", "boutique", "home");
    wizard.set_item_complete("specific-retail-terms", true).unwrap();
    wizard.set_item_complete("admin-kbis", true).unwrap();
    let total = wizard.checklist().total();
    assert_eq!(wizard.checklist().completed(), 2);

    profile(&mut wizard, "SARL", "software", "home");
    assert_eq!(wizard.checklist().completed(), 1);

    wizard.reset_wizard();
    drop(wizard);

    let (mut wizard, _) = session(dir.path(), "");
    profile(&mut wizard, "SARL", "boutique", "home");
    let list = wizard.checklist();
    assert_eq!(list.total(), total);
    assert_eq!(list.completed(), 2);
    let expected = ((2.0 * 100.0) / total as f64).round() as u8;
    assert_eq!(list.progress(), expected);
}
