//! Error types for dungeon definitions.

use crate::DungeonId;

/// Errors raised while loading or validating dungeon templates.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The catalog JSON could not be parsed.
    #[cfg(feature = "json")]
    #[error("catalog decode failed: {0}")]
    Decode(serde_json::Error),

    /// The template parsed but is internally inconsistent.
    #[error("dungeon {dungeon} is invalid: {reason}")]
    InvalidDungeon { dungeon: DungeonId, reason: String },
}
