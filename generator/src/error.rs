// Licensed under the Apache-2.0 license

//! Generator error taxonomy.
//!
//! Fatal conditions are scoped: a missing channel or a key collision aborts
//! the affected address map's context, a recursion overflow aborts the
//! affected template, and independent address maps and templates keep
//! processing. Malformed directives are not errors at this level at all;
//! they degrade to visible markers in the rendered text (see
//! [`crate::template`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No ancestor of the node carries an access-channel property and no
    /// default channel was configured.
    #[error("no access channel resolvable for `{path}` (and no default channel configured)")]
    MissingChannel { path: String },

    /// An explicitly set property collides with a derived context key.
    #[error("property `{key}` on `{path}` collides with a derived context key")]
    KeyCollision { key: String, path: String },

    /// Directive recursion exceeded the configured bound; almost always a
    /// template that re-enters itself.
    #[error("template `{template}` exceeded the recursion limit of {limit}")]
    TemplateRecursion { template: String, limit: usize },

    /// A rendered destination file name came out empty.
    #[error("template `{template}` produced an empty destination file name")]
    EmptyDestination { template: String },

    #[error(transparent)]
    Model(#[from] regspace_model::ModelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
