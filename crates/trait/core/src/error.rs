//! Error infrastructure for trait-core.
//!
//! Lifecycle failures surface to the caller that triggered them. Failures found
//! while ticking are reported by the scheduler through logs and tick reports,
//! never to a waiting caller.
//!
//! # Design Principles
//!
//! - **Caller bugs vs. broken dependencies**: an unknown code is a validation
//!   problem, a failing attribute store is fatal for the operation
//! - **Severity Classification**: every variant maps to an [`ErrorSeverity`]
//!   so hosts can pick a logging level or recovery strategy

use crate::behaviour::BehaviourError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, TraitError>;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown trait code, degenerate definition
    Validation,

    /// Failure raised by external code plugged into the system.
    ///
    /// Examples: a behaviour handler returning an error
    Internal,

    /// A dependency the core cannot work without is broken.
    ///
    /// Examples: attribute store I/O failure, poisoned lock
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TraitError {
    /// The code is absent from the trait registry.
    #[error("trait `{0}` does not exist")]
    UnknownTrait(String),

    #[error("invalid definition for trait `{code}`: {reason}")]
    InvalidDefinition { code: String, reason: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("behaviour for `{property}` failed")]
    Behaviour {
        property: String,
        #[source]
        source: BehaviourError,
    },
}

impl TraitError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTrait(_) | Self::InvalidDefinition { .. } => ErrorSeverity::Validation,
            Self::Behaviour { .. } => ErrorSeverity::Internal,
            Self::Store(_) => ErrorSeverity::Fatal,
        }
    }

    /// Stable identifier for this error variant, for metrics and tests.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTrait(_) => "unknown_trait",
            Self::InvalidDefinition { .. } => "invalid_definition",
            Self::Store(_) => "store",
            Self::Behaviour { .. } => "behaviour",
        }
    }

    pub fn is_unknown_trait(&self) -> bool {
        matches!(self, Self::UnknownTrait(_))
    }
}
