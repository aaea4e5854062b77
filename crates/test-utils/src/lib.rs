// crates/test-utils/src/lib.rs

//! Shared helpers for drenv's integration tests.
//!
//! - [`builders`] assembles resolved environments without TOML.
//! - [`fakes`] provides a scripted cluster, a recording command runner and a
//!   journal that timestamps every call they see.

pub mod builders;
pub mod fakes;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows for failing tests.
/// `DRENV_LOG=debug` also shows hook and driver output.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("DRENV_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}
