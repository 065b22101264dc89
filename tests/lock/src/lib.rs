//! Shared helpers for the lock tests.

#![forbid(unsafe_code)]

/// Initialize `env_logger` once per test binary; safe to call from every
/// test.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
