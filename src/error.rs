use crate::type_tag::TypeTag;
use thiserror::Error;

/// Errors returned by the strict lookup methods (`try_get`, `with`, `with_mut`).
///
/// The regular getters never fail; they fold both cases into an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested key was not found
    #[error("key not found in store: {0}")]
    KeyNotFound(String),

    /// The key holds a value of a different type than the one requested
    #[error("type mismatch for key {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: TypeTag,
        found: TypeTag,
    },
}
