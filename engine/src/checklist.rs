//! Post-registration checklist: generation plus durable completion state.

use charter_core::checklist;
use charter_core::form::company_profile;
use charter_types::{ChecklistCategory, CompletionSet};
use thiserror::Error;

use crate::store::{KeyValueStore, keys, load, save};
use crate::wizard::Wizard;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    #[error("no checklist item with id {0:?}")]
    UnknownItem(String),
}

/// The checklist for the current profile with its completion state.
#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    pub categories: Vec<ChecklistCategory>,
    pub completion: CompletionSet,
}

impl Checklist {
    #[must_use]
    pub fn total(&self) -> usize {
        checklist::total_items(&self.categories)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        checklist::completed_items(&self.categories, &self.completion)
    }

    /// Percentage of items done, recomputed on every call.
    #[must_use]
    pub fn progress(&self) -> u8 {
        checklist::progress(&self.categories, &self.completion)
    }
}

impl<S: KeyValueStore> Wizard<S> {
    /// Completion state; unreadable data counts as nothing done.
    #[must_use]
    pub fn checklist_completion(&self) -> CompletionSet {
        match load::<CompletionSet, _>(&self.store, keys::CHECKLIST_COMPLETION) {
            Ok(completion) => completion.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to load checklist completion: {e}");
                CompletionSet::default()
            }
        }
    }

    /// Generate the checklist from the current record.
    #[must_use]
    pub fn checklist(&self) -> Checklist {
        Checklist {
            categories: checklist::generate(&company_profile(&self.record)),
            completion: self.checklist_completion(),
        }
    }

    /// Mark an item of the current checklist done or not done.
    pub fn set_item_complete(&mut self, id: &str, complete: bool) -> Result<(), ChecklistError> {
        let categories = checklist::generate(&company_profile(&self.record));
        if checklist::find_item(&categories, id).is_none() {
            return Err(ChecklistError::UnknownItem(id.to_string()));
        }
        let mut completion = self.checklist_completion();
        completion.set(id, complete);
        self.save_completion(&completion);
        Ok(())
    }

    /// Flip an item; returns its new state.
    pub fn toggle_item(&mut self, id: &str) -> Result<bool, ChecklistError> {
        let categories = checklist::generate(&company_profile(&self.record));
        if checklist::find_item(&categories, id).is_none() {
            return Err(ChecklistError::UnknownItem(id.to_string()));
        }
        let mut completion = self.checklist_completion();
        let complete = completion.toggle(id);
        self.save_completion(&completion);
        Ok(complete)
    }

    fn save_completion(&mut self, completion: &CompletionSet) {
        if let Err(e) = save(&mut self.store, keys::CHECKLIST_COMPLETION, completion) {
            tracing::warn!("Failed to save checklist completion: {e}");
        }
    }
}
