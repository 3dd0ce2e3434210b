//! Legal-entity and role identifiers.
//!
//! These are plain identifiers. The rules attached to them (which roles are
//! unique, minimum capital, ...) live in the catalog in `charter-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Entity Types
// ============================================================================

/// Legal form of the company being registered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum EntityType {
    /// Société par actions simplifiée.
    #[default]
    #[serde(rename = "SAS")]
    Sas,
    /// Single-shareholder SAS.
    #[serde(rename = "SASU")]
    Sasu,
    /// Société à responsabilité limitée.
    #[serde(rename = "SARL")]
    Sarl,
    /// Single-member SARL.
    #[serde(rename = "EURL")]
    Eurl,
    /// Société anonyme.
    #[serde(rename = "SA")]
    Sa,
    /// Société en commandite par actions.
    #[serde(rename = "SCA")]
    Sca,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityType::Sas => "SAS",
            EntityType::Sasu => "SASU",
            EntityType::Sarl => "SARL",
            EntityType::Eurl => "EURL",
            EntityType::Sa => "SA",
            EntityType::Sca => "SCA",
        }
    }

    /// Parse an entity identifier, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, UnknownEntityType> {
        let trimmed = raw.trim();
        Self::all()
            .iter()
            .copied()
            .find(|entity| entity.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownEntityType(trimmed.to_string()))
    }

    #[must_use]
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Sas,
            EntityType::Sasu,
            EntityType::Sarl,
            EntityType::Eurl,
            EntityType::Sa,
            EntityType::Sca,
        ]
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Organizational role a participant can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    President,
    DirectorGeneral,
    Manager,
    Director,
    /// Generic shareholder/partner role with no governance duty.
    #[default]
    Partner,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::President => "president",
            Role::DirectorGeneral => "director_general",
            Role::Manager => "manager",
            Role::Director => "director",
            Role::Partner => "partner",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, UnknownRole> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "president" => Ok(Role::President),
            "director_general" | "dg" => Ok(Role::DirectorGeneral),
            "manager" | "gerant" => Ok(Role::Manager),
            "director" | "administrator" => Ok(Role::Director),
            "partner" | "shareholder" | "associate" => Ok(Role::Partner),
            _ => Err(UnknownRole(raw.trim().to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Contributions
// ============================================================================

/// Nature of a participant's capital contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContributionType {
    #[default]
    Cash,
    InKind,
    SweatEquity,
}

impl ContributionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ContributionType::Cash => "cash",
            ContributionType::InKind => "in-kind",
            ContributionType::SweatEquity => "sweat-equity",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(ContributionType::Cash),
            "in-kind" | "in_kind" | "inkind" => Some(ContributionType::InKind),
            "sweat-equity" | "sweat_equity" | "industry" => Some(ContributionType::SweatEquity),
            _ => None,
        }
    }
}
