// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the flowmap transform stream.
//!
//! Construction problems (bad configuration, non-callable input) are reported
//! synchronously through [`FlowMapError`]. Once a stream exists, the only way
//! to signal failure is `destroy(Some(error))`, which carries a
//! [`FlowMapError`] to the stream's event subscribers.
//!
//! # Examples
//!
//! ```
//! use flowmap_error::{FlowMapError, Result};
//!
//! fn check_watermark(value: i64) -> Result<usize> {
//!     usize::try_from(value).map_err(|_| {
//!         FlowMapError::validation("highWaterMark", "must be a non-negative integer")
//!     })
//! }
//!
//! assert!(check_watermark(-1).is_err());
//! ```

/// Root error type for all flowmap operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowMapError {
    /// An argument that should describe a callable does not.
    #[error("invalid input argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// A configuration option has a value of the wrong semantic type.
    ///
    /// Produced by the options validator and returned unchanged by the
    /// stream constructors.
    #[error("invalid option `{option}`: {message}")]
    Validation {
        /// Name of the offending option, as spelled in the configuration
        option: String,
        /// Description of the expected value
        message: String,
    },

    /// A write was attempted after the stream was destroyed.
    #[error("stream has been destroyed")]
    StreamDestroyed,

    /// A write was attempted after the writable side was ended.
    #[error("write after end")]
    WriteAfterEnd,

    /// The readable side is gone and the stream does not allow half-open operation.
    #[error("readable side closed")]
    ReadableClosed,

    /// The internal buffer is at its high water mark.
    #[error("buffer full: high water mark of {high_water_mark} reached")]
    BufferFull {
        /// The configured watermark
        high_water_mark: usize,
    },

    /// Error supplied by user code, typically passed to `destroy`.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FlowMapError {
    /// Create an invalid-argument error with the given message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a validation error for the named option
    pub fn validation(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Check if this error can only be raised while constructing a stream
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::Validation { .. })
    }

    /// Check if retrying the same write later may succeed
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::BufferFull { .. })
    }
}

/// Specialized Result type for flowmap operations
pub type Result<T> = std::result::Result<T, FlowMapError>;

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to a user error.
    ///
    /// Errors other than [`FlowMapError::UserError`] are returned unchanged.
    ///
    /// # Errors
    /// Returns `Err(FlowMapError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FlowMapError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| match e.into() {
            FlowMapError::UserError(inner) => {
                FlowMapError::UserError(format!("{}: {inner}", context.into()).into())
            }
            other => other,
        })
    }
}
