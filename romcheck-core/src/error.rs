use thiserror::Error;

/// Errors raised while building a [`Catalog`](crate::Catalog).
///
/// These describe a misconfigured table, never a property of a ROM file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two formats share the same id
    #[error("duplicate format id: {0}")]
    DuplicateId(String),

    /// A format id is empty
    #[error("format id must not be empty")]
    EmptyId,

    /// An extension is not lowercase or does not start with '.'
    #[error("invalid extension {extension:?} for format {id}")]
    InvalidExtension { id: String, extension: String },

    /// A signature has nothing to compare against
    #[error("empty signature pattern for format {0}")]
    EmptySignature(String),
}

impl CatalogError {
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    pub fn invalid_extension(id: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::InvalidExtension {
            id: id.into(),
            extension: extension.into(),
        }
    }

    pub fn empty_signature(id: impl Into<String>) -> Self {
        Self::EmptySignature(id.into())
    }
}
