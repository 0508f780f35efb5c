//! Pure analytics over project and payment snapshots.
//!
//! # Responsibility
//! - Aggregate trailing twelve-month earnings.
//! - Summarize project statuses.
//! - Compose both into the dashboard payload.
//!
//! # Invariants
//! - No I/O and no state across calls; every function takes an immutable
//!   snapshot and returns a new value.

pub mod dashboard;
pub mod earnings;
pub mod status;
