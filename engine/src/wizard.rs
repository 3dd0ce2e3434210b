//! The wizard state machine.
//!
//! [`Wizard`] owns the canonical [`RegistrationRecord`]. Every change goes
//! through [`Wizard::dispatch`]: the transition is applied to produce the
//! next record, the next record is committed in memory, then written to the
//! store. A failed write is logged and otherwise ignored; memory is never
//! rolled back.

use std::time::Instant;

use charter_core::steps::{self, StepDefinition, StepError};
use charter_types::{RegistrationRecord, StepIndex, StepPayload, Transition, UserPreferences};

use crate::entry::EntryParams;
use crate::snapshot::RecordSnapshot;
use crate::store::{KeyValueStore, keys, save};

/// Markers that live for one session only and are never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionMarkers {
    /// The post-bootstrap navigation guard has already run.
    pub nav_guard_ran: bool,
}

/// Whether the first step may render yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Bootstrap grace period; nothing renders before `ready_at`.
    Initializing { ready_at: Instant },
    Ready,
}

/// What the rendering layer should show.
#[derive(Debug, Clone, Copy)]
pub enum View {
    Initializing,
    Step(&'static StepDefinition),
}

#[derive(Debug)]
pub struct Wizard<S> {
    pub(crate) record: RegistrationRecord,
    pub(crate) store: S,
    pub(crate) markers: SessionMarkers,
    pub(crate) entry: EntryParams,
    pub(crate) phase: Phase,
}

impl<S: KeyValueStore> Wizard<S> {
    /// Fresh wizard over `store` without restoring anything.
    ///
    /// Use [`Wizard::bootstrap`] for the normal startup sequence.
    pub fn new(store: S) -> Self {
        Self {
            record: RegistrationRecord::default(),
            store,
            markers: SessionMarkers::default(),
            entry: EntryParams::default(),
            phase: Phase::Ready,
        }
    }

    #[must_use]
    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    #[must_use]
    pub fn markers(&self) -> SessionMarkers {
        self.markers
    }

    /// Entry parameters as left after bootstrap (without `reset`).
    #[must_use]
    pub fn entry(&self) -> &EntryParams {
        &self.entry
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Apply `transition`, commit the result, then persist it.
    pub fn dispatch(&mut self, transition: Transition) {
        let name = transition.name();
        self.record = self.record.apply(transition);
        tracing::debug!(
            transition = name,
            current_step = %self.record.current_step(),
            "Applied transition"
        );
        self.persist();
    }

    /// Shallow-merge `payload` into `step`. No validation.
    pub fn update_step(&mut self, step: StepIndex, payload: StepPayload) {
        self.dispatch(Transition::MergeStep { step, payload });
    }

    /// Move to `step` unconditionally. Unknown indices render as landing.
    pub fn set_current_step(&mut self, step: StepIndex) {
        self.dispatch(Transition::SetCurrentStep(step));
    }

    pub fn update_user_preferences(&mut self, partial: UserPreferences) {
        self.dispatch(Transition::MergePreferences(partial));
    }

    /// Replace the record with the default one and clear its durable keys.
    ///
    /// Checklist completion is kept. Calling this twice is the same as once.
    pub fn reset_wizard(&mut self) {
        self.record = self.record.apply(Transition::Reset);
        for key in [keys::REGISTRATION, keys::INITIALIZED] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to clear {key}: {e}");
            }
        }
        tracing::info!("Wizard reset");
    }

    /// Write the current record. Returns false (after logging) on failure.
    pub(crate) fn persist(&mut self) -> bool {
        let snapshot = RecordSnapshot::new(self.record.clone());
        match save(&mut self.store, keys::REGISTRATION, &snapshot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Autosave failed: {e}");
                false
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Step definition for the current step; unknown indices give landing.
    #[must_use]
    pub fn current_step(&self) -> &'static StepDefinition {
        steps::resolve(self.record.current_step())
    }

    #[must_use]
    pub fn view(&self) -> View {
        match self.phase {
            Phase::Initializing { .. } => View::Initializing,
            Phase::Ready => View::Step(self.current_step()),
        }
    }

    /// Errors that keep the current step from completing.
    #[must_use]
    pub fn validate_current(&self) -> Vec<StepError> {
        self.current_step().validate(&self.record)
    }

    /// Validate the current step and move to the next one.
    ///
    /// On the last step a clean validation leaves the step unchanged.
    pub fn advance(&mut self) -> Result<StepIndex, Vec<StepError>> {
        let errors = self.validate_current();
        if !errors.is_empty() {
            tracing::debug!(
                step = self.current_step().id,
                errors = errors.len(),
                "Advance blocked"
            );
            return Err(errors);
        }
        let current = self.current_step();
        if current.is_last() {
            return Ok(current.index);
        }
        let next = current.index.next();
        self.set_current_step(next);
        Ok(next)
    }

    /// Move to the previous step, stopping at landing.
    pub fn back(&mut self) -> StepIndex {
        let previous = self.current_step().index.previous();
        self.set_current_step(previous);
        previous
    }

    /// `(position, data step count)` for steps with a progress bar.
    #[must_use]
    pub fn progress(&self) -> Option<(u32, u32)> {
        steps::position(self.record.current_step())
    }

    /// The developer reset action is only offered with `debug` set.
    #[must_use]
    pub fn developer_reset_available(&self) -> bool {
        self.entry.debug_enabled()
    }
}
