//! Tracing subscriber initialization.
//!
//! `RUST_LOG` wins when set; otherwise the given default directive applies.
//! Every entry point is idempotent: once a global subscriber exists, later
//! calls are no-ops.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is absent or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// JSON logs with timestamps, filtered by `RUST_LOG` (default `info`).
pub fn init() {
    init_with_default(DEFAULT_DIRECTIVE);
}

/// Same as [`init`] with a caller-chosen fallback directive
/// (e.g. `"billops_bulk=debug,info"`).
pub fn init_with_default(directive: &str) {
    let filter = env_filter(directive);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(default_directive = directive, "tracing initialized");
    }
}

/// Human-readable output captured by the test harness.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_a_no_op() {
        init_for_tests();
        init();
        init_with_default("warn");
        tracing::info!("still logging after repeated init");
    }
}
