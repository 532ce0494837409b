//! Subscriber installation
//!
//! `init` is the only place a global subscriber is installed outside tests.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output on stderr, comparison internals at debug
    Development,
    /// JSON lines on stderr, operation boundaries only
    Production,
    /// Bare registry; pair with `init_test_capture()`
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    ///
    /// The `structdiff` prefix covers every crate of the workspace.
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "structdiff=debug",
            Profile::Production => "structdiff=info",
            Profile::Test => "off",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call has an effect. Output goes to stderr so that
/// comparison reports on stdout stay machine-readable.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(profile.filter())
            .init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(profile.filter())
            .init(),
        Profile::Test => tracing_subscriber::registry().init(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_workspace_crates() {
        assert_eq!(Profile::Development.default_directive(), "structdiff=debug");
        assert_eq!(Profile::Production.default_directive(), "structdiff=info");
        assert_eq!(Profile::Test.default_directive(), "off");
    }
}
