//! Loading dungeon templates from JSON.
//!
//! A catalog is a JSON array of [`DungeonType`] objects. Every entry is
//! validated before it is returned, so a catalog either loads completely
//! or not at all.

use crate::{DefinitionError, DungeonType};

/// Parses and validates a JSON catalog.
///
/// ## Example
///
/// ```rust
/// let json = r#"[{
///     "id": "cave", "name": "Cave",
///     "min_level": 1, "max_level": 10,
///     "min_party_size": 1, "max_party_size": 4,
///     "par_time_ms": 100000,
///     "layout": {
///         "entry_room": "entry", "boss_room": "boss",
///         "rooms": [
///             { "id": "entry", "type": "entry", "connections": ["boss"] },
///             { "id": "boss", "type": "boss" }
///         ]
///     }
/// }]"#;
///
/// let dungeons = delve_types::parse_catalog(json).unwrap();
/// assert_eq!(dungeons[0].id.as_str(), "cave");
/// ```
///
/// # Errors
/// [`DefinitionError::Decode`] for malformed JSON,
/// [`DefinitionError::InvalidDungeon`] for the first inconsistent template.
pub fn parse_catalog(json: &str) -> Result<Vec<DungeonType>, DefinitionError> {
    let dungeons: Vec<DungeonType> =
        serde_json::from_str(json).map_err(DefinitionError::Decode)?;
    for dungeon in &dungeons {
        dungeon.validate()?;
    }
    Ok(dungeons)
}
