//! Error types for the part network

use thiserror::Error;

use crate::{BlockPos, LocalizedMessage, NetworkId, PartPos, PartTypeId};

/// Core part network errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartnetError {
    // Lookup errors
    #[error("Part container not found at {0}")]
    PartContainerNotFound(BlockPos),

    #[error("Part state not found at {0}")]
    PartStateNotFound(PartPos),

    #[error("Part position already occupied: {0}")]
    PartPosOccupied(PartPos),

    // Registry errors
    #[error("Unknown part type: {0}")]
    UnknownPartType(PartTypeId),

    #[error("Unknown part type name: {0}")]
    UnknownPartTypeName(String),

    #[error("Duplicate part type: {0}")]
    DuplicatePartType(String),

    #[error("Unknown aspect {aspect} on part type {part_type}")]
    UnknownAspect { part_type: String, aspect: String },

    // Channel errors
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Channel already exists: {0}")]
    ChannelExists(String),

    // Network errors
    #[error("Network not found: {0}")]
    NetworkNotFound(NetworkId),

    #[error("No network contains {0}")]
    NotInNetwork(PartPos),

    #[error("Element {0} is not a member")]
    ElementNotFound(String),

    // Configuration errors
    #[error("Validation failed: {0}")]
    Validation(LocalizedMessage),

    #[error("Invalid part state record: {0}")]
    InvalidRecord(String),

    // Part type callbacks
    #[error("Part hook failed: {0}")]
    Hook(String),
}

impl PartnetError {
    /// Lookup failures are unrecoverable for the member that hit them
    pub fn is_lookup_fatal(&self) -> bool {
        matches!(
            self,
            PartnetError::PartContainerNotFound(_) | PartnetError::PartStateNotFound(_)
        )
    }
}

/// Result type for part network operations
pub type PartnetResult<T> = Result<T, PartnetError>;
