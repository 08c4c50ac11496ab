// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for schema loading.
//!
//! Lookups on unknown entity names never produce an error; they return
//! `None`, `false` or an empty list. Only configuration and deployment
//! problems surface here.

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading schema hierarchies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No schema description could be located for the requested version.
    #[error("schema resource not found for version {version}")]
    SchemaNotFound { version: String },

    /// The schema source located a description but failed to read it.
    #[error("failed to load schema {version}: {message}")]
    Source { version: String, message: String },

    /// A supertype override entry did not match `VERSION:TypeName=Forced`.
    #[error("invalid supertype override: {0}")]
    InvalidOverride(String),
}

impl Error {
    /// Shorthand for [`Error::SchemaNotFound`].
    pub fn not_found(version: impl Into<String>) -> Self {
        Error::SchemaNotFound {
            version: version.into(),
        }
    }
}
