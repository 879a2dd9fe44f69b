//! Error types for the rules engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    /// A card capability was declared without anything to run on resolution
    #[error("Ability '{0}' must define a handler or choices")]
    MissingEffect(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    /// `pay` failed after `can_pay` reported the cost affordable
    #[error("Cost invariant violated while activating '{ability}': {reason}")]
    CostInvariant { ability: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RulesError>;
