//! Typed failures callers need to tell apart
//!
//! Everything else travels as a plain `anyhow::Error`; these variants are
//! wrapped into one as well and recovered with `downcast_ref::<SkinError>()`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinError {
    /// The markup asset fetch did not answer with a success status.
    SkinNotFound { path: String },
    /// The normalized markup produced nothing that can be mounted.
    MalformedMarkup { path: String, reason: String },
    /// The placeholder left the page before the graft happened.
    PlaceholderMissing { id: String },
}

impl SkinError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::SkinNotFound { path: path.into() }
    }

    /// The skin path this failure refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::SkinNotFound { path } | Self::MalformedMarkup { path, .. } => Some(path),
            Self::PlaceholderMissing { .. } => None,
        }
    }
}

impl fmt::Display for SkinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkinNotFound { path } => write!(f, "Skin at path \"{}\" not found", path),
            Self::MalformedMarkup { path, reason } => {
                write!(f, "Skin markup at path \"{}\" is malformed: {}", path, reason)
            }
            Self::PlaceholderMissing { id } => {
                write!(f, "Placeholder for widget \"{}\" is no longer attached to the page", id)
            }
        }
    }
}

impl std::error::Error for SkinError {}
