//! Test-only helpers shared by the matchplay integration tests.

pub mod logging;
