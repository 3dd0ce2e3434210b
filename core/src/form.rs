//! Typed views over the free-form step payloads.
//!
//! Payloads are written by external form logic and are versionless, so every
//! read here is lenient: missing or malformed fields take their defaults.

use charter_types::{
    CompanyProfile, EntityType, Participant, PremisesType, RegistrationRecord, StepIndex,
    StepPayload,
};
use serde_json::{Value, json};

use crate::catalog;

pub const ENTITY_STEP: StepIndex = StepIndex::new(1);
pub const COMPANY_STEP: StepIndex = StepIndex::new(2);
pub const PARTNERS_STEP: StepIndex = StepIndex::new(3);
pub const SUMMARY_STEP: StepIndex = StepIndex::new(4);

/// Payload field names, shared with the rendering layer.
pub mod fields {
    pub const ENTITY_TYPE: &str = "entityType";
    pub const PARTNER_COUNT: &str = "partnerCount";
    pub const COMPANY_NAME: &str = "companyName";
    pub const ACTIVITY: &str = "activity";
    pub const PREMISES_TYPE: &str = "premisesType";
    pub const HAS_EMPLOYEES: &str = "hasEmployees";
    pub const PARTICIPANTS: &str = "participants";
    pub const PARTICIPANTS_TOUCHED: &str = "participantsTouched";
    pub const DECLARED_CAPITAL: &str = "declaredCapital";
    pub const CAPITAL_CONFIRMED: &str = "capitalConfirmed";
}

fn text<'a>(record: &'a RegistrationRecord, step: StepIndex, field: &str) -> Option<&'a str> {
    record
        .field(step, field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn flag(record: &RegistrationRecord, step: StepIndex, field: &str) -> bool {
    match record.field(step, field) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(value)) => matches!(value.trim(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn number(record: &RegistrationRecord, step: StepIndex, field: &str) -> Option<f64> {
    match record.field(step, field)? {
        Value::Number(value) => value.as_f64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Entity step
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySelection {
    /// Resolved entity type; the baseline when nothing valid was chosen.
    pub entity_type: EntityType,
    /// Whether the payload names a known entity type.
    pub chosen: bool,
    /// Declared count, when it is a whole number from 1 to [`catalog::MAX_PARTNERS`].
    pub declared_count: Option<u32>,
    /// A `partnerCount` is present but unusable (fractional, out of range,
    /// not a number).
    pub invalid_count: bool,
}

impl EntitySelection {
    #[must_use]
    pub fn read(record: &RegistrationRecord) -> Self {
        let raw = text(record, ENTITY_STEP, fields::ENTITY_TYPE);
        let parsed = raw.map(EntityType::parse);
        let entity_type = match raw {
            Some(raw) => catalog::resolve(raw).entity_type,
            None => catalog::BASELINE,
        };
        let present = record.field(ENTITY_STEP, fields::PARTNER_COUNT).is_some();
        let declared_count = number(record, ENTITY_STEP, fields::PARTNER_COUNT)
            .filter(|count| count.fract().abs() < f64::EPSILON)
            .filter(|count| (1.0..=f64::from(catalog::MAX_PARTNERS)).contains(count))
            .map(|count| count as u32);
        Self {
            entity_type,
            chosen: matches!(parsed, Some(Ok(_))),
            declared_count,
            invalid_count: present && declared_count.is_none(),
        }
    }

    /// Whether the declared count blocks the entity step and list regeneration.
    /// Single-member types ignore the count.
    #[must_use]
    pub fn count_rejected(&self) -> bool {
        self.invalid_count
            && catalog::config(self.entity_type).partners != catalog::PartnerPolicy::Single
    }

    /// Number of participants the partners step must hold.
    #[must_use]
    pub fn partner_count(&self) -> u32 {
        catalog::config(self.entity_type).partner_count(self.declared_count)
    }
}

// ============================================================================
// Company step
// ============================================================================

/// Profile fed to the checklist generator.
#[must_use]
pub fn company_profile(record: &RegistrationRecord) -> CompanyProfile {
    CompanyProfile {
        entity_type: EntitySelection::read(record).entity_type,
        activity: text(record, COMPANY_STEP, fields::ACTIVITY)
            .unwrap_or_default()
            .to_string(),
        premises: text(record, COMPANY_STEP, fields::PREMISES_TYPE)
            .and_then(PremisesType::parse)
            .unwrap_or_default(),
        has_employees: flag(record, COMPANY_STEP, fields::HAS_EMPLOYEES),
    }
}

#[must_use]
pub fn company_name(record: &RegistrationRecord) -> Option<&str> {
    text(record, COMPANY_STEP, fields::COMPANY_NAME)
}

// ============================================================================
// Partners step
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartnersForm {
    pub participants: Vec<Participant>,
    /// Set once the user edited any participant field.
    pub touched: bool,
    pub declared_capital: Option<f64>,
    /// Set by the explicit "validate this amount" action.
    pub capital_confirmed: bool,
}

impl PartnersForm {
    #[must_use]
    pub fn read(record: &RegistrationRecord) -> Self {
        let participants = match record.field(PARTNERS_STEP, fields::PARTICIPANTS) {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed participant list: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self {
            participants,
            touched: flag(record, PARTNERS_STEP, fields::PARTICIPANTS_TOUCHED),
            declared_capital: number(record, PARTNERS_STEP, fields::DECLARED_CAPITAL),
            capital_confirmed: flag(record, PARTNERS_STEP, fields::CAPITAL_CONFIRMED),
        }
    }

    /// Payload fragment holding every field of this form.
    #[must_use]
    pub fn to_payload(&self) -> StepPayload {
        let mut payload = StepPayload::new();
        payload.insert(
            fields::PARTICIPANTS.to_string(),
            serde_json::to_value(&self.participants).unwrap_or_else(|_| json!([])),
        );
        payload.insert(
            fields::PARTICIPANTS_TOUCHED.to_string(),
            Value::Bool(self.touched),
        );
        payload.insert(
            fields::DECLARED_CAPITAL.to_string(),
            self.declared_capital.map_or(Value::Null, |amount| json!(amount)),
        );
        payload.insert(
            fields::CAPITAL_CONFIRMED.to_string(),
            Value::Bool(self.capital_confirmed),
        );
        payload
    }
}
