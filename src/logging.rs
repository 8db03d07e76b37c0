//! Logger installation for binaries and tests.
//!
//! The library only logs through the `log` facade. Call [`init`] from `main`
//! to get `env_logger` output; `RUST_LOG` overrides the default `info` filter.

use env_logger::{Builder, Env};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs `env_logger`. Later calls, or a logger installed elsewhere, are left in place.
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)).try_init();
}

/// Like [`init`], with output captured by the test harness.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .is_test(true)
        .try_init();
}
