//! Loading dungeon catalogs and manager config from disk.

use std::path::Path;

use delve_engine::{DungeonHooks, DungeonManager, ManagerConfig};
use delve_types::DungeonType;

use crate::DelveError;

async fn read(path: &Path) -> Result<String, DelveError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DelveError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads and validates a JSON catalog of dungeon templates.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<DungeonType>, DelveError> {
    let json = read(path.as_ref()).await?;
    Ok(delve_types::parse_catalog(&json)?)
}

/// Registers every template in the catalog at `path`. Returns how many were
/// registered.
pub async fn register_catalog_file<G: DungeonHooks>(
    manager: &mut DungeonManager<G>,
    path: impl AsRef<Path>,
) -> Result<usize, DelveError> {
    let path = path.as_ref();
    let dungeons = load_catalog(path).await?;
    let count = dungeons.len();
    for dungeon in dungeons {
        manager.register_dungeon_type(dungeon)?;
    }
    tracing::info!(path = %path.display(), count, "catalog loaded");
    Ok(count)
}

/// Reads a [`ManagerConfig`] from a JSON file. Missing fields take their
/// defaults.
pub async fn load_config(path: impl AsRef<Path>) -> Result<ManagerConfig, DelveError> {
    let json = read(path.as_ref()).await?;
    Ok(serde_json::from_str(&json)?)
}
