//! # focus-bill
//!
//! The bill of materials recorded for one build: every artifact coordinate
//! the build touched, deduplicated and sorted, one canonical string per
//! line in `recording.txt` next to the build output directory.
//!
//! ```rust,no_run
//! use focus_bill::BillStore;
//! use focus_core::ArtifactCoordinate;
//!
//! let store = BillStore::new("/tmp/project/target/recording.txt");
//! let lib: ArtifactCoordinate = "com.acme:lib:jar:1.0".parse().unwrap();
//! let total = store.record([&lib]).unwrap();
//! assert_eq!(total, 1);
//! ```

pub mod error;
pub mod store;

pub use error::BillError;
pub use store::{BillStore, BILL_FILE_NAME};
