#![forbid(unsafe_code)]

//! Drawer configuration.
//!
//! A [`DrawerConfig`] is built once and handed to the drawer at
//! construction; nothing mutates it afterwards. Every field has a default
//! matching the stock drawer behavior, so `DrawerConfig::default()` is a
//! complete, valid configuration.
//!
//! # Loading
//!
//! With the `config-file` feature the configuration can be read from TOML
//! or JSON. Missing fields fall back to their defaults.
//!
//! ```toml
//! toggle_key = "togglePanel"
//! open_duration_ms = 350
//! damping_ratio = 0.9
//!
//! [shadow]
//! opacity = 0.25
//! ```
//!
//! ```rust,ignore
//! let config = DrawerConfig::from_toml_file("drawer.toml")?;
//! ```

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::geometry::GeometryPolicy;

/// Default key of the toggle command channel.
pub const DEFAULT_TOGGLE_KEY: &str = "togglePanel";

// ---------------------------------------------------------------------------
// Leaf types
// ---------------------------------------------------------------------------

/// Drop shadow applied to the main surface while the auxiliary surface is
/// attached.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct ShadowStyle {
    pub offset_x: f64,
    pub offset_y: f64,
    /// In `[0, 1]`.
    pub opacity: f32,
    pub radius: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            offset_x: -5.0,
            offset_y: 0.0,
            opacity: 0.4,
            radius: 7.0,
        }
    }
}

impl ShadowStyle {
    /// A shadow that draws nothing.
    pub const NONE: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        opacity: 0.0,
        radius: 0.0,
    };
}

/// How the auxiliary surface moves while the drawer opens and closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "snake_case"))]
pub enum AuxiliaryMotion {
    /// Slides in from the leading edge on open and back out on close.
    #[default]
    Slide,
    /// Stays at offset `0` underneath the main surface.
    Fixed,
}

/// Status bar appearance hint carried by the container.
///
/// The drawer never interprets it; hosts read it back when styling chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "snake_case"))]
pub enum StatusBarStyle {
    #[default]
    Default,
    Light,
}

// ---------------------------------------------------------------------------
// DrawerConfig
// ---------------------------------------------------------------------------

/// Read-only tunables for a drawer instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct DrawerConfig {
    /// Name of the command channel the drawer listens on.
    pub toggle_key: String,
    /// Open animation duration in milliseconds.
    pub open_duration_ms: u64,
    /// Close animation duration in milliseconds.
    pub close_duration_ms: u64,
    /// Main surface swap animation duration in milliseconds.
    pub swap_duration_ms: u64,
    /// Spring damping ratio in `(0, 1]`; `1.0` is critically damped.
    pub damping_ratio: f64,
    /// Width of main surface left visible when the drawer is open.
    pub max_auxiliary_inset: f64,
    /// The open threshold is `container_width / open_threshold_ratio`.
    pub open_threshold_ratio: f64,
    pub shadow: ShadowStyle,
    pub auxiliary_motion: AuxiliaryMotion,
    pub status_bar_style: StatusBarStyle,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            toggle_key: DEFAULT_TOGGLE_KEY.to_string(),
            open_duration_ms: 500,
            close_duration_ms: 500,
            swap_duration_ms: 500,
            damping_ratio: 1.0,
            max_auxiliary_inset: 80.0,
            open_threshold_ratio: 3.0,
            shadow: ShadowStyle::default(),
            auxiliary_motion: AuxiliaryMotion::Slide,
            status_bar_style: StatusBarStyle::Default,
        }
    }
}

impl DrawerConfig {
    /// Create a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration whose transitions complete instantly.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            open_duration_ms: 0,
            close_duration_ms: 0,
            swap_duration_ms: 0,
            ..Self::default()
        }
    }

    /// Set the command channel key.
    #[must_use]
    pub fn with_toggle_key(mut self, key: impl Into<String>) -> Self {
        self.toggle_key = key.into();
        self
    }

    /// Set the open animation duration.
    #[must_use]
    pub fn with_open_duration(mut self, duration: Duration) -> Self {
        self.open_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the close animation duration.
    #[must_use]
    pub fn with_close_duration(mut self, duration: Duration) -> Self {
        self.close_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the swap animation duration.
    #[must_use]
    pub fn with_swap_duration(mut self, duration: Duration) -> Self {
        self.swap_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the spring damping ratio.
    #[must_use]
    pub fn with_damping_ratio(mut self, ratio: f64) -> Self {
        self.damping_ratio = ratio;
        self
    }

    /// Set the visible main surface strip width when open.
    #[must_use]
    pub fn with_max_auxiliary_inset(mut self, inset: f64) -> Self {
        self.max_auxiliary_inset = inset;
        self
    }

    /// Set the open threshold ratio.
    #[must_use]
    pub fn with_open_threshold_ratio(mut self, ratio: f64) -> Self {
        self.open_threshold_ratio = ratio;
        self
    }

    /// Set the shadow style.
    #[must_use]
    pub fn with_shadow(mut self, shadow: ShadowStyle) -> Self {
        self.shadow = shadow;
        self
    }

    /// Set how the auxiliary surface moves.
    #[must_use]
    pub fn with_auxiliary_motion(mut self, motion: AuxiliaryMotion) -> Self {
        self.auxiliary_motion = motion;
        self
    }

    /// Set the status bar style hint.
    #[must_use]
    pub fn with_status_bar_style(mut self, style: StatusBarStyle) -> Self {
        self.status_bar_style = style;
        self
    }

    #[inline]
    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_duration_ms)
    }

    #[inline]
    pub fn close_duration(&self) -> Duration {
        Duration::from_millis(self.close_duration_ms)
    }

    #[inline]
    pub fn swap_duration(&self) -> Duration {
        Duration::from_millis(self.swap_duration_ms)
    }

    /// Geometry policy derived from the inset and threshold ratio.
    #[must_use]
    pub fn geometry(&self) -> GeometryPolicy {
        GeometryPolicy::new(self.max_auxiliary_inset, self.open_threshold_ratio)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.toggle_key.trim().is_empty() {
            errors.push("toggle_key must not be empty".into());
        }

        if !(self.damping_ratio > 0.0 && self.damping_ratio <= 1.0) {
            errors.push(format!(
                "damping_ratio must be in (0, 1], got {}",
                self.damping_ratio
            ));
        }

        if !(self.max_auxiliary_inset >= 0.0) || !self.max_auxiliary_inset.is_finite() {
            errors.push(format!(
                "max_auxiliary_inset must be >= 0, got {}",
                self.max_auxiliary_inset
            ));
        }

        if !(self.open_threshold_ratio > 0.0) || !self.open_threshold_ratio.is_finite() {
            errors.push(format!(
                "open_threshold_ratio must be > 0, got {}",
                self.open_threshold_ratio
            ));
        }

        if !(0.0..=1.0).contains(&self.shadow.opacity) {
            errors.push(format!(
                "shadow.opacity must be in [0, 1], got {}",
                self.shadow.opacity
            ));
        }

        if self.shadow.radius < 0.0 {
            errors.push(format!(
                "shadow.radius must be >= 0, got {}",
                self.shadow.radius
            ));
        }

        errors
    }

    /// Return `self` if valid, otherwise every violation as one error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config-file")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating a [`DrawerConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io(std::io::Error),
    /// TOML parse failure.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// TOML serialization failure.
    #[cfg(feature = "config-file")]
    TomlSerialize(toml::ser::Error),
    /// JSON parse failure.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// One or more values out of range.
    Invalid(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "drawer config I/O error: {err}"),
            #[cfg(feature = "config-file")]
            Self::Toml(err) => write!(f, "drawer config TOML error: {err}"),
            #[cfg(feature = "config-file")]
            Self::TomlSerialize(err) => write!(f, "drawer config TOML encode error: {err}"),
            #[cfg(feature = "config-file")]
            Self::Json(err) => write!(f, "drawer config JSON error: {err}"),
            Self::Invalid(errors) => {
                write!(f, "invalid drawer config: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            #[cfg(feature = "config-file")]
            Self::Toml(err) => Some(err),
            #[cfg(feature = "config-file")]
            Self::TomlSerialize(err) => Some(err),
            #[cfg(feature = "config-file")]
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
