//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::path::Path;
use std::time::{Duration, Instant};

use charter_engine::{EntryParams, FileStore, Restore, Wizard};
use charter_types::StepPayload;
use charter_utils::Durability;
use serde_json::Value;

pub const GRACE: Duration = Duration::from_millis(300);

/// One "process": bootstrap over `dir`, then let the grace period elapse.
pub fn session(dir: &Path, entry: &str) -> (Wizard<FileStore>, Restore) {
    let store = FileStore::new(dir).with_durability(Durability::Relaxed);
    let start = Instant::now();
    let (mut wizard, restore) =
        Wizard::bootstrap(store, &EntryParams::parse(entry), GRACE, start);
    wizard.tick(start + GRACE);
    (wizard, restore)
}

pub fn payload(value: Value) -> StepPayload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
