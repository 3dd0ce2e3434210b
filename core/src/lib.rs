//! Domain rules for Charter.
//!
//! Everything here is a pure function over `charter-types` values:
//!
//! - **`catalog`**: per-entity-type roles, minimum capital, partner policy
//! - **`roles`**: role uniqueness/requiredness and participant regeneration
//! - **`capital`**: ownership shares and capital validation
//! - **`checklist`**: profile-driven post-registration task list
//! - **`form`**: typed views over step payloads
//! - **`steps`**: the static step table and per-step validators

pub mod capital;
pub mod catalog;
pub mod checklist;
pub mod form;
pub mod roles;
pub mod steps;

pub use capital::{Allocation, CapitalError, allocate, declared_capital, validate_allocation};
pub use catalog::{EntityTypeConfig, PartnerPolicy, RoleSpec};
pub use form::{EntitySelection, PartnersForm, company_profile};
pub use roles::{
    MissingRequiredRole, RoleRejection, check_assignment, duplicated_unique_roles,
    is_role_set_complete, missing_required_roles, reconcile_participants,
};
pub use steps::{StepDefinition, StepError};
