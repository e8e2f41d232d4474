//! Synchronization between the entity store and the external task file.
//!
//! The controller owns the shared store handle, fetches and watches the
//! project's task file through the [`SnapshotSource`] seam, and flushes
//! pending task updates back out. All collaborator failures surface as data
//! on the store, never as errors thrown at the UI.

/// Project configuration.
pub mod config;
/// The sync controller.
pub mod controller;
/// Collaborator seam.
pub mod source;

pub use config::{CorrelationConfig, ProjectConfig, SyncConfig};
pub use controller::{SharedTaskStore, SyncController, lock_store};
pub use source::{SnapshotEvent, SnapshotSource};
