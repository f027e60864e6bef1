//! Integration tests for tessella-buffer

use std::sync::Once;

mod registry_lifecycle;

static TRACING: Once = Once::new();

/// Route queue/registry logs through a subscriber when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}
