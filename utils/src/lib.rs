//! Shared infrastructure utilities for Charter.
//!
//! - **`atomic_write`**: crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{Durability, atomic_write, atomic_write_with, recover_backup};
