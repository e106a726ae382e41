//! Tracing setup.
//!
//! The filter comes from `VUE_TSX_AUTO_PROPS_LOG`, falling back to `RUST_LOG`.
//! Values use `RUST_LOG` syntax, e.g. `vue_tsx_auto_props=debug`.
//! Without either variable only `--verbose` turns logging on.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "VUE_TSX_AUTO_PROPS_LOG";

/// Builds the filter, or `None` when logging stays off.
fn build_filter(verbose: bool) -> Option<EnvFilter> {
    if let Ok(val) = std::env::var(LOG_ENV) {
        return Some(EnvFilter::builder().parse_lossy(val));
    }
    if std::env::var("RUST_LOG").is_ok() {
        return Some(EnvFilter::from_default_env());
    }
    verbose.then(|| EnvFilter::new("debug"))
}

/// Installs the global subscriber. All output goes to stderr so stdout stays
/// free for rewritten code and JSON summaries.
pub fn init_tracing(verbose: bool) {
    let Some(filter) = build_filter(verbose) else {
        return;
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
