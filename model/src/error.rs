// Licensed under the Apache-2.0 license

//! Errors raised while building or loading an elaborated model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// More array dimensions than the address math supports.
    #[error("`{path}` declares {dims} array dimensions, at most 2 are supported")]
    TooManyDimensions { path: String, dims: usize },

    /// The serialized model names a node kind this crate does not know.
    #[error("unknown node kind `{kind}` at `{path}`")]
    UnknownKind { kind: String, path: String },

    /// A memory node with no entry count.
    #[error("memory `{path}` has no entry count")]
    MissingEntries { path: String },

    /// A field node with no width.
    #[error("field `{path}` has zero width")]
    ZeroWidthField { path: String },

    /// A field reaching past bit 63, which no 64-bit mask can hold.
    #[error("field `{path}` spans up to bit {high}, at most bit 63 is supported")]
    FieldTooWide { path: String, high: u64 },

    /// A property value the typed model cannot represent (e.g. a float).
    #[error("unsupported value for property `{name}` at `{path}`")]
    BadProperty { name: String, path: String },

    #[error("failed to parse model: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
