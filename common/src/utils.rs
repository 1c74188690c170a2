// common/src/utils.rs
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Setup tracing for consistent logging across binaries.
///
/// `LOG_LEVEL` (trace, debug, info, warn, error) overrides the default of INFO.
pub fn setup_tracing() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| Level::from_str(&v).ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Strip trailing slashes so `base + "/api/..."` never doubles them
pub fn normalize_base_url(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

/// Join a normalized base with a path that may or may not start with '/'
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
