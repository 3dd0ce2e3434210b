//! Participants: natural persons holding a role and a stake in the company.
//!
//! The participant list is stored inside the partners step payload as a JSON
//! array. Deserialization is lenient: the payload is free-form and written by
//! external form logic, so unknown roles degrade to the generic partner role
//! and malformed amounts degrade to zero.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{ContributionType, Role};

/// Scale of [`SharePercentage`]: hundredths of a percent.
pub const FULL_SHARE_POINTS: u32 = 10_000;

// ============================================================================
// SharePercentage
// ============================================================================

/// Ownership share with two decimal places, stored as hundredths of a percent.
///
/// Serialized as a fixed two-decimal string (`"33.33"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SharePercentage(u32);

impl SharePercentage {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_points(points: u32) -> Self {
        Self(points)
    }

    #[must_use]
    pub const fn points(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for SharePercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl Serialize for SharePercentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SharePercentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let percent = number_from_value(&Value::deserialize(deserializer)?).unwrap_or(0.0);
        let points = (percent * 100.0).round().clamp(0.0, f64::from(FULL_SHARE_POINTS));
        Ok(Self(points as u32))
    }
}

// ============================================================================
// Participant
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub birth_place: String,
    pub nationality: String,
    pub address: String,
    #[serde(deserialize_with = "role_or_generic")]
    pub role: Role,
    #[serde(deserialize_with = "amount_or_zero")]
    pub contribution_amount: f64,
    #[serde(deserialize_with = "contribution_type_or_cash")]
    pub contribution_type: ContributionType,
    share_percentage: SharePercentage,
}

/// Identity fields that must be filled in before the partners step completes.
pub const IDENTITY_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "birthDate",
    "birthPlace",
    "nationality",
    "address",
];

impl Participant {
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Derived ownership share; see [`recompute_shares`].
    #[must_use]
    pub fn share_percentage(&self) -> SharePercentage {
        self.share_percentage
    }

    /// Wire names of identity fields that are blank.
    #[must_use]
    pub fn missing_identity_fields(&self) -> Vec<&'static str> {
        let values = [
            &self.first_name,
            &self.last_name,
            &self.birth_date,
            &self.birth_place,
            &self.nationality,
            &self.address,
        ];
        IDENTITY_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Set an identity field by its wire name. Returns `false` for unknown names.
    pub fn set_identity_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "birthDate" => &mut self.birth_date,
            "birthPlace" => &mut self.birth_place,
            "nationality" => &mut self.nationality,
            "address" => &mut self.address,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Whether any user-entered identity or contribution data is present.
    #[must_use]
    pub fn has_user_data(&self) -> bool {
        self.missing_identity_fields().len() < IDENTITY_FIELDS.len()
            || self.contribution_amount > 0.0
    }
}

/// Recompute every participant's share from the contribution amounts.
///
/// Shares are `amount / total * 100` rounded to two decimals. Rounding drift
/// is settled by largest remainder so the shares always add up to exactly
/// 100.00 when the total is positive. Participants without a contribution
/// always get 0.00. Returns the total contribution.
pub fn recompute_shares(participants: &mut [Participant]) -> f64 {
    let total: f64 = participants.iter().map(|p| p.contribution_amount).sum();
    if total <= 0.0 {
        for participant in participants.iter_mut() {
            participant.share_percentage = SharePercentage::ZERO;
        }
        return total.max(0.0);
    }

    let exact: Vec<f64> = participants
        .iter()
        .map(|p| p.contribution_amount / total * f64::from(FULL_SHARE_POINTS))
        .collect();
    let mut points: Vec<u32> = exact.iter().map(|value| value.floor() as u32).collect();

    let assigned: u32 = points.iter().sum();
    let remaining = FULL_SHARE_POINTS.saturating_sub(assigned) as usize;

    let mut order: Vec<usize> = (0..participants.len())
        .filter(|&index| participants[index].contribution_amount > 0.0)
        .collect();
    order.sort_by(|&a, &b| {
        let frac_a = exact[a] - exact[a].floor();
        let frac_b = exact[b] - exact[b].floor();
        frac_b.total_cmp(&frac_a).then(a.cmp(&b))
    });
    for &index in order.iter().take(remaining) {
        points[index] += 1;
    }

    for (participant, points) in participants.iter_mut().zip(points) {
        participant.share_percentage = SharePercentage::from_points(points);
    }
    total
}

// ============================================================================
// Lenient field decoding
// ============================================================================

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn amount_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let amount = number_from_value(&Value::deserialize(deserializer)?).unwrap_or(0.0);
    Ok(if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    })
}

fn role_or_generic<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|raw| Role::parse(raw).ok())
        .unwrap_or_default())
}

fn contribution_type_or_cash<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<ContributionType, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(ContributionType::parse)
        .unwrap_or_default())
}
