//! Once-per-process startup: reset signal, restore, grace period, guard.

use std::time::{Duration, Instant};

use charter_types::{RegistrationRecord, StepIndex};
use serde_json::Value;

use crate::entry::EntryParams;
use crate::snapshot::RecordSnapshot;
use crate::store::{KeyValueStore, keys, load, save};
use crate::wizard::{Phase, Wizard};

/// How the persisted state was picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restore {
    /// `reset` was in the entry parameters; everything was cleared.
    Reset,
    /// No usable snapshot; started from the default record. The initialized
    /// marker is left for the first restoration to set.
    Fresh,
    /// First restoration of a snapshot since it was started or reset:
    /// payloads kept, step forced to landing.
    FirstVisit { saved_step: StepIndex },
    /// Snapshot restored verbatim.
    Resumed,
}

impl<S: KeyValueStore> Wizard<S> {
    /// Build the wizard for this process.
    ///
    /// The wizard starts in [`Phase::Initializing`] until `now + grace`;
    /// call [`Wizard::tick`] to leave it.
    pub fn bootstrap(
        store: S,
        entry: &EntryParams,
        grace: Duration,
        now: Instant,
    ) -> (Self, Restore) {
        let mut wizard = Wizard::new(store);
        wizard.entry = entry.without_reset();
        wizard.phase = Phase::Initializing {
            ready_at: now + grace,
        };

        let restore = if entry.reset_requested() {
            wizard.reset_wizard();
            Restore::Reset
        } else {
            wizard.restore()
        };
        tracing::info!(?restore, step = %wizard.record.current_step(), "Wizard bootstrapped");
        (wizard, restore)
    }

    fn restore(&mut self) -> Restore {
        let initialized = match load::<bool, _>(&self.store, keys::INITIALIZED) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                tracing::warn!("Failed to read initialized marker: {e}");
                false
            }
        };

        let snapshot = match load::<Value, _>(&self.store, keys::REGISTRATION) {
            Ok(value) => value.and_then(RecordSnapshot::decode),
            Err(e) => {
                tracing::warn!("Failed to load registration: {e}");
                None
            }
        };

        match snapshot {
            None => {
                self.record = RegistrationRecord::default();
                Restore::Fresh
            }
            Some(record) if initialized => {
                self.record = record;
                Restore::Resumed
            }
            Some(record) => {
                let saved_step = record.current_step();
                self.record = record;
                if !saved_step.is_landing() {
                    self.set_current_step(StepIndex::LANDING);
                }
                if let Err(e) = save(&mut self.store, keys::INITIALIZED, &true) {
                    tracing::warn!("Failed to set initialized marker: {e}");
                }
                Restore::FirstVisit { saved_step }
            }
        }
    }

    /// Advance the bootstrap clock. Returns true on the tick that ends the
    /// grace period; the navigation guard runs at that moment.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Initializing { ready_at } if now >= ready_at => {
                self.phase = Phase::Ready;
                self.run_nav_guard();
                true
            }
            _ => false,
        }
    }

    /// Mark the session when it starts past landing. Never touches the record.
    fn run_nav_guard(&mut self) {
        if self.markers.nav_guard_ran || self.record.current_step().is_landing() {
            return;
        }
        self.markers.nav_guard_ran = true;
        tracing::debug!(step = %self.record.current_step(), "Navigation guard ran");
    }
}
