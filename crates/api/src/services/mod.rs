//! Per-entity services.
//!
//! Services run the domain validators, assemble partial updates, and talk
//! to the record store. They are cheap to construct and built per request
//! from a borrowed store handle.

pub mod products;
pub mod stores;
pub mod users;

pub use products::{ProductQuery, ProductService};
pub use stores::StoreService;
pub use users::UserService;

use crate::db::StoreError;

/// Failures surfaced by the entity services.
///
/// Callers pattern-match on the variant; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed a domain validator (bad image, out-of-range rating,
    /// blank required field, unknown sort key).
    #[error("{0}")]
    Validation(String),

    /// A uniqueness invariant would be broken.
    #[error("{0}")]
    Conflict(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    InvalidReference(String),

    /// The addressed entity does not exist.
    #[error("{kind} '{key}' not found")]
    NotFound {
        kind: &'static str,
        key: String,
    },

    /// A patch matched zero documents after the existence check passed;
    /// the entity vanished between the check and the write.
    #[error("no changes were applied to {kind} '{key}'")]
    UpdateFailed {
        kind: &'static str,
        key: String,
    },

    /// Login credential mismatch.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Infrastructure failure from the record store; propagated to the
    /// boundary and reported generically there.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub(crate) fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference(message.into())
    }

    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn update_failed(kind: &'static str, key: impl Into<String>) -> Self {
        Self::UpdateFailed {
            kind,
            key: key.into(),
        }
    }
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
