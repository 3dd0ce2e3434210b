//! Versioned envelope around the persisted registration record.

use charter_types::RegistrationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What is written under the `registration` key.
///
/// # Version Compatibility
///
/// A snapshot written with a different `version` is ignored on restore and
/// the wizard starts fresh. A bare record without an envelope is accepted as
/// version 0 data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub record: RegistrationRecord,
}

impl RecordSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    #[must_use]
    pub fn new(record: RegistrationRecord) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            saved_at: Utc::now(),
            record,
        }
    }

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }

    /// Record held by a stored value, if it is usable.
    #[must_use]
    pub fn decode(value: Value) -> Option<RegistrationRecord> {
        if value.get("record").is_some() {
            return match serde_json::from_value::<RecordSnapshot>(value) {
                Ok(snapshot) if snapshot.is_compatible() => Some(snapshot.record),
                Ok(snapshot) => {
                    tracing::warn!(
                        version = snapshot.version,
                        "Ignoring registration snapshot with incompatible version"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed registration snapshot: {e}");
                    None
                }
            };
        }
        match serde_json::from_value::<RegistrationRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring malformed registration record: {e}");
                None
            }
        }
    }
}
