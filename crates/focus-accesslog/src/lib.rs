//! # focus-accesslog
//!
//! Raw trace of every local-repository artifact lookup.
//!
//! The host looks artifacts up in its local repository through a
//! [`LocalRepositoryManager`]. [`AccessRecordingManager`] wraps whichever
//! manager the host would otherwise use, passes every call through
//! unchanged, and appends one `group:artifact:extension:version` line per
//! artifact lookup to `<local repo>/artifact-request.log`.
//!
//! Unlike the bill, the access log is never deduplicated or sorted, and it
//! outlives individual builds.
//!
//! ## Key components
//!
//! - [`LocalRepositoryManager`] / [`LocalRepositoryManagerFactory`] — the host seam
//! - [`SimpleLocalRepositoryManager`] — plain default-layout manager
//! - [`AccessRecordingManager`] / [`AccessRecordingFactory`] — the decorator
//! - [`AccessLog`] — append and read the trace file
//!
//! ## Key invariants
//!
//! - A failed append is logged and swallowed; the wrapped lookup still runs.
//! - Each append is one write on a freshly opened file, so concurrent
//!   lookups never interleave partial lines.

pub mod error;
pub mod log;
pub mod manager;
pub mod recording;

pub use error::AccessLogError;
pub use log::{AccessCount, AccessLog, ACCESS_LOG_FILE_NAME};
pub use manager::{
    LocalArtifactRegistration, LocalArtifactRequest, LocalArtifactResult,
    LocalMetadataRegistration, LocalMetadataRequest, LocalMetadataResult, LocalRepository,
    LocalRepositoryManager, LocalRepositoryManagerFactory, Metadata,
    SimpleLocalRepositoryManager, SimpleLocalRepositoryManagerFactory,
};
pub use recording::{AccessRecordingFactory, AccessRecordingManager, RECORDING_FACTORY_NAME};
