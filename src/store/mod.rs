//! Typed world store: declared slots over an untyped persistent property map.
//!
//! Layers, bottom up: [adapter] (sled or in-memory key/value), [queue] (deferred writes),
//! [registry] (declarations and type enforcement).

pub mod adapter;
pub mod errors;
pub mod queue;
pub mod registry;
pub mod value;

pub use adapter::{MemoryProperties, PropertyAdapter, SledProperties, SledPropertiesBuilder};
pub use errors::StoreError;
pub use queue::{FlushReport, PendingWrite, WriteQueue};
pub use registry::StoreRegistry;
pub use value::{StoreDescriptor, StoreType, StoreValue};
