#![forbid(unsafe_code)]

//! Core: geometry, configuration, gesture translation and spring motion.
//!
//! # Role in slidekit
//! `slidekit-core` is the leaf layer. Everything in it is a pure function or
//! a plain value: it never touches a surface, never schedules work and never
//! logs. The runtime (`slidekit-runtime`) consumes these types to drive the
//! drawer state machine.
//!
//! # Primary responsibilities
//! - **GeometryPolicy**: open/closed offsets, drag-follow mapping and the
//!   commit threshold for a given container width.
//! - **DrawerConfig**: the read-only tunables a drawer is built with.
//! - **GestureTranslator**: maps raw recognizer samples onto drawer inputs,
//!   gated by the recognizers the current state accepts.
//! - **Animation**: the damped [`Spring`](animation::Spring) and the
//!   immutable [`TransitionSpec`](animation::TransitionSpec) of one run.

pub mod animation;
pub mod config;
pub mod geometry;
pub mod gesture;

pub use config::{AuxiliaryMotion, ConfigError, DrawerConfig, ShadowStyle, StatusBarStyle};
pub use geometry::{GeometryPolicy, Rect, Size};
pub use gesture::{
    GestureInput, GesturePhase, GestureSample, GestureTranslator, Recognizer, RecognizerSet,
};
