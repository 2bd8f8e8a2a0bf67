//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes priority over the configured level.

use tracing_subscriber::EnvFilter;

/// Build the filter used by [`init`].
///
/// Falls back to `info` if `level` is not a valid directive.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level))
}

/// Filter for the configured `level` alone, ignoring `RUST_LOG`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global `fmt` subscriber.
///
/// Returns `false` if a subscriber was already installed, which happens when
/// the embedding application configured tracing itself.
pub fn init(level: &str) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(filter = level, "Tracing subscriber installed");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_plain_level() {
        let filter = env_filter("debug");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_level_filter_uses_configured_level() {
        assert_eq!(level_filter("debug").to_string(), "debug");
    }

    #[test]
    fn test_level_filter_invalid_level_falls_back_to_info() {
        assert_eq!(level_filter("not a [valid directive").to_string(), "info");
    }

    #[test]
    fn test_init_is_idempotent() {
        let _first = init("info");
        assert!(!init("info"));
    }
}
