//! Author-defined dungeon templates: the room graph and its bounds.
//!
//! These are static data. A template is registered once and shared by every
//! run of that dungeon; runs never mutate it.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DefinitionError, DungeonId, RoomId};

// ---------------------------------------------------------------------------
// RoomType
// ---------------------------------------------------------------------------

/// What happens when a party enters a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Entry,
    Combat,
    Elite,
    Miniboss,
    Boss,
    Event,
    Rest,
    Treasure,
}

impl RoomType {
    /// Returns `true` for rooms resolved through a combat encounter.
    pub fn is_combat(&self) -> bool {
        matches!(self, Self::Combat | Self::Elite | Self::Miniboss | Self::Boss)
    }

    /// Returns `true` for rooms that complete themselves on entry.
    pub fn auto_completes(&self) -> bool {
        matches!(self, Self::Entry | Self::Rest | Self::Treasure)
    }
}

// ---------------------------------------------------------------------------
// RoomDefinition
// ---------------------------------------------------------------------------

/// One node of the room graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDefinition {
    pub id: RoomId,

    #[serde(rename = "type")]
    pub kind: RoomType,

    /// Zero-based floor the room sits on.
    #[serde(default)]
    pub floor: u32,

    /// Rooms unlocked when this one is completed.
    #[serde(default)]
    pub connections: Vec<RoomId>,

    /// Wipe-recovery respawn point.
    #[serde(default)]
    pub checkpoint: bool,

    /// Hidden room; the first entry counts towards `secrets_found`.
    #[serde(default)]
    pub secret: bool,

    #[serde(default)]
    pub name: Option<String>,
}

impl RoomDefinition {
    /// Creates a room on floor 0 with no connections.
    pub fn new(id: impl Into<RoomId>, kind: RoomType) -> Self {
        Self {
            id: id.into(),
            kind,
            floor: 0,
            connections: Vec::new(),
            checkpoint: false,
            secret: false,
            name: None,
        }
    }

    /// Sets the outgoing connections.
    pub fn connect<I, R>(mut self, to: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoomId>,
    {
        self.connections = to.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_floor(mut self, floor: u32) -> Self {
        self.floor = floor;
        self
    }

    /// Flags the room as a checkpoint.
    pub fn checkpoint(mut self) -> Self {
        self.checkpoint = true;
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

// ---------------------------------------------------------------------------
// RoomLayout
// ---------------------------------------------------------------------------

/// The full room graph of a dungeon, rooted at `entry_room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub rooms: Vec<RoomDefinition>,
    pub entry_room: RoomId,
    pub boss_room: RoomId,

    /// Authoring hint: the graph is a single path. Not enforced.
    #[serde(default)]
    pub linear: bool,
}

impl RoomLayout {
    /// Looks up a room by id.
    pub fn room(&self, id: &RoomId) -> Option<&RoomDefinition> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    /// Returns `true` if the layout contains `id`.
    pub fn contains(&self, id: &RoomId) -> bool {
        self.room(id).is_some()
    }
}

// ---------------------------------------------------------------------------
// DungeonType
// ---------------------------------------------------------------------------

/// A registered dungeon template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonType {
    pub id: DungeonId,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    pub min_party_size: usize,
    pub max_party_size: usize,

    /// Author-assigned difficulty rating, shown to players.
    #[serde(default)]
    pub difficulty: u8,

    #[serde(default = "default_floors")]
    pub floors: u32,

    pub layout: RoomLayout,

    /// Designed completion time in milliseconds. Runs without one never
    /// earn a medal.
    #[serde(default)]
    pub par_time_ms: Option<u64>,
}

fn default_floors() -> u32 {
    1
}

impl DungeonType {
    /// Designed completion time, if any.
    pub fn par_time(&self) -> Option<Duration> {
        self.par_time_ms.map(Duration::from_millis)
    }

    /// Returns `true` if a party of `size` may enter.
    pub fn accepts_party_size(&self, size: usize) -> bool {
        (self.min_party_size..=self.max_party_size).contains(&size)
    }

    /// Returns `true` if a player of `level` falls inside the level band.
    pub fn accepts_level(&self, level: u32) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    /// Checks that the template is internally consistent.
    ///
    /// # Errors
    /// Returns [`DefinitionError::InvalidDungeon`] describing the first
    /// problem found: bad size or level bounds, duplicate room ids, a
    /// missing entry or boss room, or a connection to an unknown room.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let invalid = |reason: String| DefinitionError::InvalidDungeon {
            dungeon: self.id.clone(),
            reason,
        };

        if self.min_party_size == 0 || self.min_party_size > self.max_party_size {
            return Err(invalid(format!(
                "party size bounds {}..={} are invalid",
                self.min_party_size, self.max_party_size
            )));
        }
        if self.min_level > self.max_level {
            return Err(invalid(format!(
                "level bounds {}..={} are invalid",
                self.min_level, self.max_level
            )));
        }

        let mut seen = HashSet::with_capacity(self.layout.rooms.len());
        for room in &self.layout.rooms {
            if !seen.insert(&room.id) {
                return Err(invalid(format!("duplicate room id {}", room.id)));
            }
        }
        if !seen.contains(&self.layout.entry_room) {
            return Err(invalid(format!(
                "entry room {} is not in the layout",
                self.layout.entry_room
            )));
        }
        if !seen.contains(&self.layout.boss_room) {
            return Err(invalid(format!(
                "boss room {} is not in the layout",
                self.layout.boss_room
            )));
        }
        for room in &self.layout.rooms {
            if let Some(missing) =
                room.connections.iter().find(|c| !seen.contains(c))
            {
                return Err(invalid(format!(
                    "room {} connects to unknown room {}",
                    room.id, missing
                )));
            }
        }
        Ok(())
    }
}
