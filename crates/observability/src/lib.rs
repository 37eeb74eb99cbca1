//! Process-wide logging setup shared by binaries and integration tests.

/// Subscriber installation (filters, JSON output).
pub mod subscriber;

pub use subscriber::{DEFAULT_DIRECTIVE, init, init_for_tests, init_with_default};
