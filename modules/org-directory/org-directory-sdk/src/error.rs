//! Public error types for the `org-directory` module.
//!
//! These errors are safe to expose to other modules and to request handlers,
//! which map them onto transport status codes.

use thiserror::Error;

/// Errors that can be returned by the [`OrgDirectoryClient`](crate::OrgDirectoryClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrgDirectoryError {
    /// The anchor entity does not exist, or does not belong to the asserted tenant.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing entity (`tenant_user`, `tenant_department`, ...).
        kind: &'static str,
        /// Identifier as supplied by the caller.
        id: String,
    },

    /// A malformed or out-of-range option was supplied.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An external collaborator failed or timed out.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OrgDirectoryError {
    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if this is an unavailable error.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
