//! # hostmock - Mock fixture data for cluster UI testing
//!
//! A small fixture-generation library backing a mock cluster API:
//! synthesizes randomized but schema-valid dynamic host volume records,
//! plus the namespace and node records they reference, for UI development
//! and tests.
//!
//! ## Quick Start
//!
//! ```rust
//! use hostmock::prelude::*;
//!
//! fn main() -> TestResult<()> {
//!     let mut store = FixtureStore::new();
//!     store.seed_namespaces(&NamespaceFactory::new().with_id("default"), 1)?;
//!     store.seed_nodes(&NodeFactory::new(), 1)?;
//!
//!     let volume = store.create_volume(&VolumeFactory::new().named("vol-1"))?;
//!
//!     assert_eq!(volume.name, "vol-1");
//!     assert_eq!(volume.namespace, volume.namespace_id);
//!     assert!(volume.node_id.is_some());
//!     Ok(())
//! }
//! ```

pub mod factories;
pub mod records;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use factories::{
    adjust_relationships, Factory, FactoryBuilder, NamespaceFactory, NodeFactory, VolumeFactory,
};
pub use records::{
    default_requested_capabilities, AccessMode, AttachmentMode, Capability, NamespaceRecord,
    NodeRecord, VolumeRecord,
};
pub use store::FixtureStore;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        factories::{Factory, FactoryBuilder, NamespaceFactory, NodeFactory, VolumeFactory},
        records::{AccessMode, AttachmentMode, Capability, NamespaceRecord, NodeRecord, VolumeRecord},
        store::FixtureStore,
        TestError, TestResult,
    };

    // Re-export commonly used external types
    pub use chrono::{DateTime, Utc};
    pub use serde_json::{json, Value as JsonValue};
    pub use uuid::Uuid;
}

// Error handling
#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Factory error: {message}")]
    Factory { message: String },
}

pub type TestResult<T> = Result<T, TestError>;
