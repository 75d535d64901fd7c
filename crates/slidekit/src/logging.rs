#![forbid(unsafe_code)]

//! Optional `tracing-subscriber` installation for hosts without their own.
//!
//! Library crates never install a subscriber. Hosts that want slidekit's
//! `slidekit.*` targets on stderr call [`init`] once at startup; `RUST_LOG`
//! overrides the filter passed in.

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Filter used when neither `RUST_LOG` nor an explicit filter is given.
pub const DEFAULT_FILTER: &str = "warn,slidekit=info";

/// Install a global fmt subscriber.
///
/// Fails with [`Error::Logging`] if the filter does not parse or a global
/// subscriber is already set.
pub fn init(filter: Option<&str>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER))
            .map_err(|err| Error::Logging(err.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))?;

    tracing::debug!(
        target: "slidekit.drawer",
        version = env!("CARGO_PKG_VERSION"),
        "slidekit logging initialised"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn second_init_reports_logging_error() {
        // The global subscriber can be set once per process.
        let _ = init(Some("off"));
        assert!(matches!(init(Some("off")), Err(Error::Logging(_))));
    }
}
