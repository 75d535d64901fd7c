#![forbid(unsafe_code)]

//! slidekit public facade crate.
//!
//! Re-exports the drawer types from the internal crates, defines the
//! top-level [`Error`], and offers a small prelude for hosts embedding a
//! drawer.
//!
//! ```
//! use slidekit::prelude::*;
//!
//! let mut drawer = Drawer::new(
//!     DrawerConfig::instant(),
//!     Size::new(320.0, 640.0),
//!     HeadlessSurface::new(),
//!     Some(HeadlessSurface::new()),
//! );
//! assert!(drawer.toggle());
//! drawer.settle(std::time::Duration::from_millis(16), 4);
//! assert_eq!(drawer.state(), DrawerState::Open);
//! ```

use std::fmt;

#[cfg(feature = "fmt")]
pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use slidekit_core::animation::{Animation, Spring, TransitionSpec};
pub use slidekit_core::{
    AuxiliaryMotion, ConfigError, DrawerConfig, GeometryPolicy, GestureInput, GesturePhase,
    GestureSample, GestureTranslator, Rect, Recognizer, RecognizerSet, ShadowStyle, Size,
    StatusBarStyle,
};

// --- Runtime re-exports ----------------------------------------------------

pub use slidekit_runtime::{
    AttachmentSet, BusSubscription, ContainerId, ContentSurface, DetachedSurfaces, DragSource,
    Drawer, DrawerCommand, DrawerEvent, DrawerInput, DrawerMachine, DrawerModel, DrawerState,
    Effect, EventBus, HeadlessSurface, MachineRules, Slot, SurfaceCall, SurfaceId,
    SurfaceLifecycle, TransitionKind, TransitionRunner, TransitionToken,
};
pub use slidekit_runtime::{effects_executed_total, transitions_completed_total};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for slidekit hosts.
#[derive(Debug)]
pub enum Error {
    /// Drawer configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// I/O failure outside configuration parsing.
    Io(std::io::Error),
    /// A global tracing subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for slidekit APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Config loading -------------------------------------------------------

/// Load and validate a [`DrawerConfig`] from disk.
///
/// `.toml` files are parsed as TOML and `.json` files as JSON. Any other
/// extension is rejected with [`std::io::ErrorKind::InvalidInput`].
#[cfg(feature = "config-file")]
pub fn load_config(path: impl AsRef<std::path::Path>) -> Result<DrawerConfig> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let config = match extension.as_deref() {
        Some("toml") => DrawerConfig::from_toml_file(path)?,
        Some("json") => DrawerConfig::from_json_file(path)?,
        _ => {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsupported drawer config format: {}", path.display()),
            )));
        }
    };
    let config = config.validated()?;
    tracing::debug!(
        target: "slidekit.drawer",
        path = %path.display(),
        toggle_key = %config.toggle_key,
        "drawer config loaded"
    );
    Ok(config)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ContentSurface, Drawer, DrawerCommand, DrawerConfig, DrawerEvent, DrawerState, Error,
        EventBus, GesturePhase, GestureSample, HeadlessSurface, Recognizer, Result, Size,
    };

    pub use crate::{core, runtime};
}

pub use slidekit_core as core;
pub use slidekit_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_error_converts_and_keeps_source() {
        let err: Error = DrawerConfig::new()
            .with_damping_ratio(0.0)
            .validated()
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("damping_ratio"));
    }

    #[test]
    fn logging_error_has_no_source() {
        let err = Error::Logging("already set".into());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "logging setup failed: already set");
    }

    #[cfg(feature = "config-file")]
    mod config_file {
        use super::*;
        use std::io::Write;

        fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
            let mut file = tempfile::Builder::new()
                .suffix(suffix)
                .tempfile()
                .unwrap();
            file.write_all(body.as_bytes()).unwrap();
            file
        }

        #[test]
        fn loads_toml_by_extension() {
            let file = write_temp(".toml", "toggle_key = \"menu\"\nopen_duration_ms = 250\n");
            let config = load_config(file.path()).unwrap();
            assert_eq!(config.toggle_key, "menu");
            assert_eq!(config.open_duration_ms, 250);
        }

        #[test]
        fn loads_json_by_extension() {
            let file = write_temp(".json", r#"{ "max_auxiliary_inset": 64.0 }"#);
            let config = load_config(file.path()).unwrap();
            assert_eq!(config.max_auxiliary_inset, 64.0);
            assert_eq!(config.close_duration_ms, 500);
        }

        #[test]
        fn rejects_unknown_extension() {
            let file = write_temp(".yaml", "toggle_key: menu\n");
            let err = load_config(file.path()).unwrap_err();
            assert!(
                matches!(err, Error::Io(ref io) if io.kind() == std::io::ErrorKind::InvalidInput)
            );
        }

        #[test]
        fn invalid_values_fail_validation() {
            let file = write_temp(".toml", "open_threshold_ratio = 0.0\n");
            let err = load_config(file.path()).unwrap_err();
            assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
        }

        #[test]
        fn missing_file_is_config_io() {
            let err = load_config("/nonexistent/slidekit/drawer.toml").unwrap_err();
            assert!(matches!(err, Error::Config(ConfigError::Io(_))));
        }
    }
}
