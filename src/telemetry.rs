use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";
const QUIET_FILTER: &str = "warn";

/// Installs the global subscriber: human-readable events on stderr, filtered
/// by `RUST_LOG`. Stdout stays reserved for reports.
pub fn init_tracing(quiet: bool) {
    let fallback = if quiet { QUIET_FILTER } else { DEFAULT_FILTER };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
