use thiserror::Error;

use crate::catalog::loader::LoadError;

/// Failures that end a webhook request. None of them are retried; the
/// transport reports each one as an internal error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("could not decode webhook request: {0}")]
    Decode(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Unknown tag: {0}")]
    UnknownTag(String),
    #[error("could not encode webhook response: {0}")]
    Encode(String),
}

impl WebhookError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Load(_) => "catalog_load",
            Self::UnknownTag(_) => "unknown_tag",
            Self::Encode(_) => "encode",
        }
    }
}
