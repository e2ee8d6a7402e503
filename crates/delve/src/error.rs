//! Unified error type for Delve.

use std::path::PathBuf;

use delve_engine::DungeonError;
use delve_types::DefinitionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` conversions let `?` lift sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DelveError {
    /// A dungeon template could not be decoded or failed validation.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// A run operation failed.
    #[error(transparent)]
    Dungeon(#[from] DungeonError),

    /// A config file is not valid JSON for its type.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// A catalog or config file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
