//! Unified error types surfaced by the runtime API.
//!
//! Wraps lifecycle failures from `trait-core` and adds the failures of the
//! runtime's own coordination (locks, worker channels).
use thiserror::Error;
use tokio::sync::oneshot;

use trait_core::{ErrorSeverity, StoreError, TraitError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Trait(#[from] TraitError),

    #[error("entity lock was poisoned")]
    LockPoisoned,

    #[error("tick worker command channel closed")]
    CommandChannelClosed,

    #[error("tick worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("tick worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl From<StoreError> for RuntimeError {
    fn from(error: StoreError) -> Self {
        Self::Trait(TraitError::Store(error))
    }
}

impl RuntimeError {
    /// True when the caller named a trait the registry does not know.
    pub fn is_unknown_trait(&self) -> bool {
        matches!(self, Self::Trait(error) if error.is_unknown_trait())
    }

    /// Coordination failures are always fatal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Trait(error) => error.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Trait(error) => error.error_code(),
            Self::LockPoisoned => "lock_poisoned",
            Self::CommandChannelClosed => "command_channel_closed",
            Self::ReplyChannelClosed(_) => "reply_channel_closed",
            Self::WorkerJoin(_) => "worker_join",
        }
    }
}
