//! Tracing setup
//!
//! The subscriber is only installed when `PHPTY_LOG` (or `RUST_LOG`) is set.
//! `PHPTY_LOG` takes precedence and uses the same directive syntax as
//! `RUST_LOG` (e.g. `debug`, `phpty_types::coercion=trace`).

use tracing_subscriber::EnvFilter;

fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("PHPTY_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// All output goes to stderr so it never mixes with results on stdout.
pub fn init_tracing() {
    let has_phpty_log = std::env::var("PHPTY_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_phpty_log && !has_rust_log {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
