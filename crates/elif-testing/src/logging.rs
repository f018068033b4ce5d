//! Test logging
//!
//! Routes the model's `tracing` output through the test harness writer so
//! `cargo test -- --nocapture` with `RUST_LOG=elif_model=debug` shows the
//! statements and events of a failing test.

use std::sync::Once;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Level used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Install the test subscriber once per process
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
            .unwrap_or_else(|_| EnvFilter::new("off"));

        // another subscriber may already be installed by the test binary
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_test_writer())
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::warn!("logging initialised twice without panicking");
    }
}
