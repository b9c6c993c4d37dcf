//! Error types for frontmatter migration

use thiserror::Error;

/// Reasons a document is rejected by the migrator
///
/// Both variants reject the whole document. The migrator never hands back a
/// partially rewritten text, so the caller's copy stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrateError {
    /// The frontmatter is missing, unclosed, or not a well-formed mapping
    #[error("frontmatter is not a well-formed mapping: {reason}")]
    StructuralParse { reason: String },

    /// A field cannot be relocated as contiguous text without guessing
    #[error("field '{field}' cannot be migrated unambiguously: {reason}")]
    AmbiguousField { field: String, reason: String },
}

impl MigrateError {
    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        Self::StructuralParse {
            reason: reason.into(),
        }
    }

    pub(crate) fn ambiguous(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AmbiguousField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the rejection is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::StructuralParse { .. } => None,
            Self::AmbiguousField { field, .. } => Some(field),
        }
    }
}

pub type MigrateResult<T> = Result<T, MigrateError>;
