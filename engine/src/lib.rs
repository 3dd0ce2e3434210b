//! Wizard engine for Charter.
//!
//! Owns the registration record and everything with side effects around it:
//! durable storage, bootstrap, partners-step editing, and checklist completion.
//! The rules themselves live in `charter-core`.

mod bootstrap;
mod checklist;
mod entry;
mod partners;
mod snapshot;
pub mod store;
mod wizard;

pub use bootstrap::Restore;
pub use checklist::{Checklist, ChecklistError};
pub use entry::{DEBUG_PARAM, EntryParams, RESET_PARAM};
pub use partners::PartnerEditError;
pub use snapshot::RecordSnapshot;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use wizard::{Phase, SessionMarkers, View, Wizard};
