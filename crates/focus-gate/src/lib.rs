//! # focus-gate
//!
//! Restricts a build to a single reachable ("focus") repository.
//!
//! The [`RepositoryGate`] takes the configured profiles and a focus id and
//! returns a rewritten configuration in which every other repository points
//! at an unreachable sentinel url and a single mirror funnels all non-focus
//! traffic to the focus url. [`FocusConfigurationProcessor`] plugs the gate
//! into the host's configuration step: the host's own processor runs first,
//! then the gate's output replaces the request's profiles and mirrors.
//!
//! ## Key invariants
//!
//! - **Fail before mutation**: an unknown focus id yields
//!   [`GateError::FocusRepositoryNotConfigured`] and the input is untouched.
//! - **Idempotent**: gating an already gated configuration changes nothing.

pub mod error;
pub mod gate;
pub mod processor;

pub use error::GateError;
pub use gate::{GatedConfiguration, RepositoryGate, FOCUS_MIRROR_ID, FOCUS_PROFILE_ID, NOOP_URL};
pub use processor::{ConfigurationProcessor, FocusConfigurationProcessor};
