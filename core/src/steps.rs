//! Static step table: index → definition and completion validator.

use charter_types::{PremisesType, RegistrationRecord, StepIndex};
use serde_json::Value;
use thiserror::Error;

use crate::capital::{CapitalError, validate_allocation};
use crate::catalog::MAX_PARTNERS;
use crate::roles::{RoleRejection, duplicated_unique_roles};
use crate::form::{
    COMPANY_STEP, ENTITY_STEP, EntitySelection, PARTNERS_STEP, PartnersForm, SUMMARY_STEP,
    company_name, company_profile, fields,
};

/// Why a step cannot be completed. Always user-correctable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),
    #[error("partner count must be a whole number from 1 to {}", MAX_PARTNERS)]
    InvalidPartnerCount,
    #[error("expected {expected} partners, found {found}")]
    PartnerCountMismatch { expected: u32, found: usize },
    #[error("partner {partner}: {field} is required")]
    MissingIdentity { partner: usize, field: &'static str },
    #[error(transparent)]
    RoleTaken(RoleRejection),
    #[error(transparent)]
    Capital(#[from] CapitalError),
}

type Validator = fn(&RegistrationRecord) -> Vec<StepError>;

#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub index: StepIndex,
    pub id: &'static str,
    pub title: &'static str,
    /// Landing has no progress bar.
    pub shows_progress: bool,
    validator: Validator,
}

impl StepDefinition {
    /// Errors preventing this step from completing, in display order.
    #[must_use]
    pub fn validate(&self, record: &RegistrationRecord) -> Vec<StepError> {
        (self.validator)(record)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index == last_step()
    }
}

static STEPS: [StepDefinition; 5] = [
    StepDefinition {
        index: StepIndex::LANDING,
        id: "landing",
        title: "Register your company",
        shows_progress: false,
        validator: no_checks,
    },
    StepDefinition {
        index: ENTITY_STEP,
        id: "entity",
        title: "Legal form",
        shows_progress: true,
        validator: validate_entity,
    },
    StepDefinition {
        index: COMPANY_STEP,
        id: "company",
        title: "Company details",
        shows_progress: true,
        validator: validate_company,
    },
    StepDefinition {
        index: PARTNERS_STEP,
        id: "partners",
        title: "Partners, roles and capital",
        shows_progress: true,
        validator: validate_partners,
    },
    StepDefinition {
        index: SUMMARY_STEP,
        id: "summary",
        title: "Summary and next steps",
        shows_progress: true,
        validator: no_checks,
    },
];

/// Definition for `step`; unknown indices resolve to the landing step.
#[must_use]
pub fn resolve(step: StepIndex) -> &'static StepDefinition {
    STEPS.get(step.value() as usize).unwrap_or(&STEPS[0])
}

#[must_use]
pub fn all() -> &'static [StepDefinition] {
    &STEPS
}

#[must_use]
pub fn step_count() -> u32 {
    STEPS.len() as u32
}

#[must_use]
pub fn last_step() -> StepIndex {
    StepIndex::new(step_count() - 1)
}

/// Position among the data steps (1-based) and their count, for progress bars.
#[must_use]
pub fn position(step: StepIndex) -> Option<(u32, u32)> {
    let definition = resolve(step);
    definition
        .shows_progress
        .then(|| (definition.index.value(), step_count() - 1))
}

// ── Validators ───────────────────────────────────────────────

fn no_checks(_record: &RegistrationRecord) -> Vec<StepError> {
    Vec::new()
}

fn validate_entity(record: &RegistrationRecord) -> Vec<StepError> {
    let mut errors = Vec::new();
    match record.field(ENTITY_STEP, fields::ENTITY_TYPE).and_then(Value::as_str) {
        None => errors.push(StepError::MissingField {
            field: fields::ENTITY_TYPE,
        }),
        Some(raw) if raw.trim().is_empty() => errors.push(StepError::MissingField {
            field: fields::ENTITY_TYPE,
        }),
        Some(raw) if !EntitySelection::read(record).chosen => {
            errors.push(StepError::UnknownEntityType(raw.trim().to_string()));
        }
        Some(_) => {}
    }

    if EntitySelection::read(record).count_rejected() {
        errors.push(StepError::InvalidPartnerCount);
    }
    errors
}

fn validate_company(record: &RegistrationRecord) -> Vec<StepError> {
    let mut errors = Vec::new();
    if company_name(record).is_none() {
        errors.push(StepError::MissingField {
            field: fields::COMPANY_NAME,
        });
    }
    if company_profile(record).activity.is_empty() {
        errors.push(StepError::MissingField {
            field: fields::ACTIVITY,
        });
    }
    let premises = record
        .field(COMPANY_STEP, fields::PREMISES_TYPE)
        .and_then(Value::as_str)
        .and_then(PremisesType::parse);
    if premises.is_none() {
        errors.push(StepError::MissingField {
            field: fields::PREMISES_TYPE,
        });
    }
    errors
}

fn validate_partners(record: &RegistrationRecord) -> Vec<StepError> {
    let selection = EntitySelection::read(record);
    let form = PartnersForm::read(record);
    let mut errors = Vec::new();

    let expected = selection.partner_count();
    if form.participants.len() != expected as usize {
        errors.push(StepError::PartnerCountMismatch {
            expected,
            found: form.participants.len(),
        });
    }

    for (index, participant) in form.participants.iter().enumerate() {
        errors.extend(
            participant
                .missing_identity_fields()
                .into_iter()
                .map(|field| StepError::MissingIdentity {
                    partner: index + 1,
                    field,
                }),
        );
    }

    errors.extend(
        duplicated_unique_roles(selection.entity_type, &form.participants)
            .into_iter()
            .map(StepError::RoleTaken),
    );

    errors.extend(
        validate_allocation(selection.entity_type, &form.participants)
            .into_iter()
            .map(StepError::from),
    );
    errors
}
