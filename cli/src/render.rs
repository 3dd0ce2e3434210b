//! Plain-text rendering of wizard state.

use std::fmt::Write;

use charter_core::capital::validate_allocation;
use charter_core::catalog;
use charter_core::form::{EntitySelection, company_name};
use charter_core::steps::StepError;
use charter_engine::{Checklist, KeyValueStore, View, Wizard};
use charter_types::UserPreferences;

pub fn status<S: KeyValueStore>(wizard: &Wizard<S>) -> String {
    let mut out = String::new();
    let step = match wizard.view() {
        View::Initializing => return "Still initializing...\n".to_string(),
        View::Step(step) => step,
    };

    match wizard.progress() {
        Some((position, count)) => {
            let _ = writeln!(out, "Step {position}/{count}: {}", step.title);
        }
        None => {
            let _ = writeln!(out, "{}", step.title);
        }
    }

    let record = wizard.record();
    let selection = EntitySelection::read(record);
    if selection.chosen {
        let _ = writeln!(
            out,
            "  Entity: {} ({} partner(s))",
            catalog::config(selection.entity_type).label,
            selection.partner_count()
        );
    }
    if let Some(name) = company_name(record) {
        let _ = writeln!(out, "  Company: {name}");
    }

    let errors = wizard.validate_current();
    if errors.is_empty() {
        if !step.is_last() {
            out.push_str("  Ready to continue.\n");
        }
    } else {
        out.push_str("  To complete this step:\n");
        out.push_str(&error_list(&errors));
    }

    if wizard.developer_reset_available() {
        out.push_str("  [debug] `charter reset` discards this registration.\n");
    }
    out
}

pub fn error_list(errors: &[StepError]) -> String {
    errors.iter().fold(String::new(), |mut out, error| {
        let _ = writeln!(out, "    - {error}");
        out
    })
}

pub fn partners<S: KeyValueStore>(wizard: &Wizard<S>) -> String {
    let selection = EntitySelection::read(wizard.record());
    let config = catalog::config(selection.entity_type);
    let form = wizard.partners_form();
    let mut out = String::new();

    let _ = writeln!(out, "{} partners:", config.label);
    for (index, participant) in form.participants.iter().enumerate() {
        let name = format!("{} {}", participant.first_name, participant.last_name);
        let name = if name.trim().is_empty() { "(unnamed)" } else { name.trim() };
        let _ = writeln!(
            out,
            "  {}. {name:<24} {:<24} {:>12.2} € {:<12} {:>6}%",
            index + 1,
            config.label_for(participant.role),
            participant.contribution_amount,
            participant.contribution_type.as_str(),
            participant.share_percentage(),
        );
    }

    let total: f64 = form.participants.iter().map(|p| p.contribution_amount).sum();
    let _ = writeln!(out, "  Total contributions: {total:.2} €");
    if let Some(declared) = form.declared_capital {
        let suffix = if form.capital_confirmed { " (confirmed)" } else { "" };
        let _ = writeln!(out, "  Declared capital: {declared:.2} €{suffix}");
    }

    let errors = validate_allocation(selection.entity_type, &form.participants);
    for error in errors {
        let _ = writeln!(out, "  ! {error}");
    }
    out
}

pub fn preferences(preferences: &UserPreferences) -> String {
    if preferences.is_empty() {
        return "No preferences set.\n".to_string();
    }
    preferences
        .iter()
        .fold(String::new(), |mut out, (name, enabled)| {
            let _ = writeln!(out, "{name}: {}", if enabled { "on" } else { "off" });
            out
        })
}

pub fn checklist(checklist: &Checklist) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Checklist: {}/{} done ({}%)",
        checklist.completed(),
        checklist.total(),
        checklist.progress()
    );
    for category in &checklist.categories {
        let _ = writeln!(out, "\n{}", category.title);
        for item in &category.items {
            let mark = if checklist.completion.is_complete(item.id) { 'x' } else { ' ' };
            let _ = writeln!(
                out,
                "  [{mark}] {} ({}) {}",
                item.title, item.timeframe, item.id
            );
            if let Some(link) = item.link {
                let _ = writeln!(out, "      {link}");
            }
        }
    }
    out
}
