use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(std::env::var("RUST_LOG").ok()))
        .with_target(false)
        .try_init()
        .ok();
}

// Falls back to the default when the directive is absent or unparsable.
fn filter_from(directive: Option<String>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
