//! Core domain types for Charter.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod checklist;
mod entity;
mod participant;
mod record;

pub use checklist::{
    CategoryId, ChecklistCategory, ChecklistItem, CompanyProfile, CompletionSet, PremisesType,
    Timeframe,
};
pub use entity::{ContributionType, EntityType, Role, UnknownEntityType, UnknownRole};
pub use participant::{
    FULL_SHARE_POINTS, IDENTITY_FIELDS, Participant, SharePercentage, recompute_shares,
};
pub use record::{RegistrationRecord, StepIndex, StepPayload, Transition, UserPreferences};
