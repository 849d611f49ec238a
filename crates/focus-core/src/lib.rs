//! # focus-core
//!
//! Shared vocabulary for Repo Focus: the values every other crate passes
//! around.
//!
//! - [`ArtifactCoordinate`] — canonical artifact identity and its string codec
//! - [`RepositoryDescriptor`], [`Profile`], [`MirrorRule`] — the slice of the
//!   host's settings model the repository gate rewrites
//! - [`ExecutionRequest`] — the per-build configuration the host hands to
//!   configuration processors
//! - [`FocusConfig`] — recognized `focus.*` options with their defaults
//! - [`SessionHandle`] — opaque host session passed back on host calls

pub mod config;
pub mod coordinate;
pub mod error;
pub mod repository;
pub mod session;

pub use config::FocusConfig;
pub use coordinate::ArtifactCoordinate;
pub use error::{ConfigError, CoordinateError};
pub use repository::{ExecutionRequest, MirrorRule, Profile, RepositoryDescriptor, RepositoryPolicy};
pub use session::SessionHandle;
