use thiserror::Error;

use crate::location::LocationId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("no edge from {from} to {to} in the location graph")]
    IllegalTransition { from: LocationId, to: LocationId },
    #[error("input script segment {index} is invalid: {reason}")]
    InvalidScript { index: usize, reason: String },
}

/// Failure reported by a render or audio collaborator. Always cosmetic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{collaborator} failed during {operation}: {reason}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub operation: &'static str,
    pub reason: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            collaborator,
            operation,
            reason: reason.into(),
        }
    }
}
