//! Post-registration checklist types.
//!
//! Checklists are derived from a [`CompanyProfile`] on every read and are never
//! persisted. Only completion state is persisted, in a [`CompletionSet`] keyed
//! by item id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EntityType;

// ============================================================================
// Profile
// ============================================================================

/// Kind of premises the company operates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PremisesType {
    /// Registered at the founder's home.
    #[default]
    Home,
    /// Registered with a domiciliation company.
    Domiciliation,
    /// Rented office space.
    OfficeRental,
    /// Commercial lease (shop, workshop, warehouse).
    CommercialLease,
}

impl PremisesType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PremisesType::Home => "home",
            PremisesType::Domiciliation => "domiciliation",
            PremisesType::OfficeRental => "office-rental",
            PremisesType::CommercialLease => "commercial-lease",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "home" => Some(PremisesType::Home),
            "domiciliation" => Some(PremisesType::Domiciliation),
            "office-rental" | "office" | "rented" => Some(PremisesType::OfficeRental),
            "commercial-lease" | "commercial" => Some(PremisesType::CommercialLease),
            _ => None,
        }
    }

    /// Rented or commercial space the company is liable for.
    #[must_use]
    pub const fn is_business_premises(self) -> bool {
        matches!(
            self,
            PremisesType::OfficeRental | PremisesType::CommercialLease
        )
    }
}

/// Inputs of the checklist generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyProfile {
    pub entity_type: EntityType,
    pub activity: String,
    pub premises: PremisesType,
    pub has_employees: bool,
}

// ============================================================================
// Items and categories
// ============================================================================

/// How soon after registration a task should be done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timeframe {
    Immediate,
    FirstWeek,
    FirstMonth,
    ThreeMonths,
    Later,
}

impl Timeframe {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Timeframe::Immediate => "immediate",
            Timeframe::FirstWeek => "first-week",
            Timeframe::FirstMonth => "first-month",
            Timeframe::ThreeMonths => "three-months",
            Timeframe::Later => "later",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    Administrative,
    Tax,
    Insurance,
    HumanResources,
    Business,
    Specific,
}

impl CategoryId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CategoryId::Administrative => "administrative",
            CategoryId::Tax => "tax",
            CategoryId::Insurance => "insurance",
            CategoryId::HumanResources => "human-resources",
            CategoryId::Business => "business",
            CategoryId::Specific => "specific",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One post-registration task. Ids are stable across regenerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub timeframe: Timeframe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistCategory {
    pub id: CategoryId,
    pub title: &'static str,
    pub items: Vec<ChecklistItem>,
}

// ============================================================================
// Completion
// ============================================================================

/// Completion state keyed by checklist item id.
///
/// Independent of any particular registration: it survives checklist
/// regeneration and wizard resets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeMap<String, bool>);

impl CompletionSet {
    #[must_use]
    pub fn is_complete(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: impl Into<String>, complete: bool) {
        self.0.insert(id.into(), complete);
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_complete(id);
        self.set(id, next);
        next
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().filter(|done| **done).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
