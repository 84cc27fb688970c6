use crate::{DecodeError, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod cards;
mod defense;
mod strength;

pub use strength::*;

/// Error categories the integration layer maps onto replies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    StateConflict,
    Decode,
    Storage,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("run has not been initialised")]
    RunNotInitialized,
    #[error("couldn't find group with number {0}")]
    GroupNotFound(u32),
    #[error("no group is being defended against")]
    NoActiveGroup,
    #[error("no card recorded for depth {depth}")]
    NoCardForDepth { depth: usize },
    #[error("no previous card")]
    NoPreviousCard,
    #[error("no active card, advance first")]
    NoActiveCard,
    #[error("unknown card {0}")]
    UnknownCard(String),
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GroupNotFound(_)
            | Self::NoActiveGroup
            | Self::NoCardForDepth { .. }
            | Self::NoPreviousCard
            | Self::NoActiveCard => ErrorKind::NotFound,
            Self::UnknownCard(_) | Self::InvalidArgument { .. } => ErrorKind::Validation,
            Self::RunNotInitialized | Self::Decode(_) => ErrorKind::Decode,
            Self::Store(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}
