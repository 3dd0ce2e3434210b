//! The registration record and its transitions.
//!
//! `RegistrationRecord` is immutable from the outside: every change is a
//! [`Transition`] applied with [`RegistrationRecord::apply`], which returns a
//! new record. A transition is applied completely or not at all.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form field map owned by one wizard step.
pub type StepPayload = Map<String, Value>;

// ============================================================================
// StepIndex
// ============================================================================

/// Position in the wizard step sequence. Step 0 is the landing screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StepIndex(u32);

impl StepIndex {
    pub const LANDING: Self = Self(0);

    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_landing(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// UserPreferences
// ============================================================================

/// Named boolean toggles for optional UI affordances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPreferences(BTreeMap<String, bool>);

impl UserPreferences {
    #[must_use]
    pub fn get(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    pub fn merge(&mut self, partial: UserPreferences) {
        self.0.extend(partial.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for UserPreferences {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// Every way the registration record can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Shallow-merge fields into one step's payload.
    MergeStep {
        step: StepIndex,
        payload: StepPayload,
    },
    /// Move to a step. No bounds or ordering checks.
    SetCurrentStep(StepIndex),
    /// Replace everything with the default record.
    Reset,
    MergePreferences(UserPreferences),
}

impl Transition {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Transition::MergeStep { .. } => "merge_step",
            Transition::SetCurrentStep(_) => "set_current_step",
            Transition::Reset => "reset",
            Transition::MergePreferences(_) => "merge_preferences",
        }
    }
}

// ============================================================================
// RegistrationRecord
// ============================================================================

/// Full in-progress wizard state for one registration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    current_step: StepIndex,
    #[serde(default)]
    steps: BTreeMap<StepIndex, StepPayload>,
    #[serde(default)]
    user_preferences: UserPreferences,
}

impl RegistrationRecord {
    #[must_use]
    pub fn current_step(&self) -> StepIndex {
        self.current_step
    }

    /// Payload for `step`, or `None` when the step has never been written.
    #[must_use]
    pub fn payload(&self, step: StepIndex) -> Option<&StepPayload> {
        self.steps.get(&step)
    }

    /// Single field of a step payload.
    #[must_use]
    pub fn field(&self, step: StepIndex, name: &str) -> Option<&Value> {
        self.steps.get(&step).and_then(|payload| payload.get(name))
    }

    pub fn steps(&self) -> impl Iterator<Item = (StepIndex, &StepPayload)> {
        self.steps.iter().map(|(index, payload)| (*index, payload))
    }

    #[must_use]
    pub fn user_preferences(&self) -> &UserPreferences {
        &self.user_preferences
    }

    /// Apply a transition, returning the resulting record.
    #[must_use]
    pub fn apply(&self, transition: Transition) -> RegistrationRecord {
        match transition {
            Transition::MergeStep { step, payload } => {
                let mut next = self.clone();
                next.steps.entry(step).or_default().extend(payload);
                next
            }
            Transition::SetCurrentStep(step) => RegistrationRecord {
                current_step: step,
                ..self.clone()
            },
            Transition::Reset => RegistrationRecord::default(),
            Transition::MergePreferences(partial) => {
                let mut next = self.clone();
                next.user_preferences.merge(partial);
                next
            }
        }
    }
}
