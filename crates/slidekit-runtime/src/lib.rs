#![forbid(unsafe_code)]

//! slidekit Runtime
//!
//! This crate ties the pure pieces of `slidekit-core` into a working drawer.
//!
//! # Key Components
//!
//! - [`DrawerMachine`] - Pure `(model, input) -> (model, effects)` reducer
//! - [`Drawer`] - Event-loop driver that owns the surfaces and runs effects
//! - [`SurfaceLifecycle`] - Idempotent attach/detach bookkeeping
//! - [`TransitionRunner`] - Frame-driven spring transitions with completion
//! - [`EventBus`] - Injected, typed replacement for a global notification
//!   center
//! - [`HeadlessSurface`] - Recording [`ContentSurface`] for tests
//!
//! # Role in slidekit
//! `slidekit-runtime` is the orchestrator. Hosts feed it recognizer samples,
//! commands and frame deltas; it decides what the drawer does and tells the
//! host's surfaces where to be.

pub mod bus;
pub mod drawer;
pub mod effect_system;
pub mod headless;
pub mod machine;
pub mod runner;
pub mod surface;

pub use bus::{BusSubscription, EventBus};
pub use drawer::{DetachedSurfaces, Drawer, DrawerEvent};
pub use effect_system::{effects_executed_total, transitions_completed_total};
pub use headless::{CALL_HISTORY_LIMIT, HeadlessSurface, SurfaceCall};
pub use machine::{
    DragSource, DrawerCommand, DrawerInput, DrawerMachine, DrawerModel, DrawerState, Effect,
    MachineRules, Slot, Step, Track, Transition, TransitionKind, TransitionToken,
};
pub use runner::{TransitionId, TransitionRunner};
pub use surface::{AttachmentSet, ContainerId, ContentSurface, SurfaceId, SurfaceLifecycle};
