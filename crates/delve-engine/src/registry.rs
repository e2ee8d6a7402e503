//! Registered dungeon templates.

use std::collections::HashMap;
use std::sync::Arc;

use delve_types::{DefinitionError, DungeonId, DungeonType};

/// Dungeon templates known to a manager, keyed by id.
///
/// Templates are stored behind `Arc` so runs can hold a snapshot of the
/// template they started with.
#[derive(Debug, Default)]
pub struct DungeonRegistry {
    dungeons: HashMap<DungeonId, Arc<DungeonType>>,
}

impl DungeonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores `dungeon`, replacing any template with the same
    /// id.
    pub fn register(&mut self, dungeon: DungeonType) -> Result<(), DefinitionError> {
        dungeon.validate()?;

        let id = dungeon.id.clone();
        let rooms = dungeon.layout.rooms.len();
        if self.dungeons.insert(id.clone(), Arc::new(dungeon)).is_some() {
            tracing::warn!(dungeon_id = %id, rooms, "dungeon type replaced");
        } else {
            tracing::info!(dungeon_id = %id, rooms, "dungeon type registered");
        }
        Ok(())
    }

    pub fn get(&self, id: &DungeonId) -> Option<Arc<DungeonType>> {
        self.dungeons.get(id).cloned()
    }

    /// Borrowing lookup, for callers that only need to read the template.
    pub fn get_ref(&self, id: &DungeonId) -> Option<&DungeonType> {
        self.dungeons.get(id).map(|d| d.as_ref())
    }

    pub fn contains(&self, id: &DungeonId) -> bool {
        self.dungeons.contains_key(id)
    }

    /// All templates, sorted by id.
    pub fn all(&self) -> Vec<Arc<DungeonType>> {
        let mut all: Vec<_> = self.dungeons.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.dungeons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dungeons.is_empty()
    }
}
