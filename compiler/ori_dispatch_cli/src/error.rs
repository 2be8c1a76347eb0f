//! Errors from loading a program model or building its dispatch table.

use std::path::PathBuf;

use ori_dispatch::DispatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid program model: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),

    #[error("class `{class}` extends unknown class `{parent}`")]
    UnknownParent { class: String, parent: String },

    #[error("class `{0}` is part of an inheritance cycle")]
    Cycle(String),

    #[error("method `{class}.{member}` needs an arity")]
    MissingArity { class: String, member: String },

    #[error("accessor `{class}.{member}` cannot declare an arity")]
    AccessorArity { class: String, member: String },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
