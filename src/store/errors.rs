use thiserror::Error;

use crate::store::value::StoreType;

/// Errors that can arise while interacting with the typed world store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The property name is empty, too long or contains whitespace/control characters.
    #[error("invalid property name '{0}'")]
    InvalidName(String),

    /// The name was never registered with the registry.
    #[error("{0} is not a registered store")]
    UndefinedStore(String),

    /// The store is registered but holds no persisted value yet (or the read failed).
    #[error("{0} is not defined")]
    NotDefined(String),

    /// A write carried a value whose kind differs from the declared store type.
    #[error("type mismatch: {name} is {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: StoreType,
        found: StoreType,
    },

    /// A literal supplied on the console could not be coerced to the store type.
    #[error("cannot parse '{literal}' as {expected}")]
    UnparsableLiteral {
        literal: String,
        expected: StoreType,
    },

    /// The name is already registered with a different type.
    #[error("{name} is already registered as {existing}")]
    DuplicateStore { name: String, existing: StoreType },
}
