//! A dungeon run in progress and the records it produces.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use delve_types::{
    Difficulty, DungeonId, DungeonParty, DungeonType, GameId, Loot, RoomId, RunId,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{DungeonHooks, Medal, RoomStatus, RunOutcome, RunStatus};

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// Per-run state of one room.
///
/// Generated content is cached here so that re-entering a failed room
/// replays the same encounter instead of rolling a new one.
pub struct RoomState<G: DungeonHooks> {
    pub room_id: RoomId,
    pub status: RoomStatus,
    /// Number of times the party has entered this room.
    pub attempts: u32,
    pub encounter: Option<G::Encounter>,
    pub event: Option<G::Event>,
    /// Treasure rolled for this room, if it is a treasure room.
    pub loot: Option<Loot>,
    /// Offset from run start of the most recent entry.
    pub entered_at: Option<Duration>,
    /// Offset from run start of completion.
    pub completed_at: Option<Duration>,
}

impl<G: DungeonHooks> RoomState<G> {
    pub(crate) fn new(room_id: RoomId, status: RoomStatus) -> Self {
        Self {
            room_id,
            status,
            attempts: 0,
            encounter: None,
            event: None,
            loot: None,
            entered_at: None,
            completed_at: None,
        }
    }
}

impl<G: DungeonHooks> Clone for RoomState<G> {
    fn clone(&self) -> Self {
        Self {
            room_id: self.room_id.clone(),
            status: self.status,
            attempts: self.attempts,
            encounter: self.encounter.clone(),
            event: self.event.clone(),
            loot: self.loot.clone(),
            entered_at: self.entered_at,
            completed_at: self.completed_at,
        }
    }
}

impl<G: DungeonHooks> fmt::Debug for RoomState<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomState")
            .field("room_id", &self.room_id)
            .field("status", &self.status)
            .field("attempts", &self.attempts)
            .field("encounter", &self.encounter)
            .field("event", &self.event)
            .field("loot", &self.loot)
            .field("entered_at", &self.entered_at)
            .field("completed_at", &self.completed_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Stats and results
// ---------------------------------------------------------------------------

/// What the game reports after a fight is won.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub enemies_defeated: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub healing_done: u64,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub rooms_cleared: u32,
    pub enemies_defeated: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub healing_done: u64,
    pub death_count: u32,
    pub secrets_found: u32,
    /// Run duration. Set when the run ends.
    pub elapsed: Duration,
}

impl RunStats {
    pub(crate) fn record_combat(&mut self, combat: &CombatResult) {
        self.enemies_defeated = self.enemies_defeated.saturating_add(combat.enemies_defeated);
        self.damage_dealt = self.damage_dealt.saturating_add(combat.damage_dealt);
        self.damage_taken = self.damage_taken.saturating_add(combat.damage_taken);
        self.healing_done = self.healing_done.saturating_add(combat.healing_done);
    }
}

/// The record produced when a run ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonResult {
    pub run_id: RunId,
    pub dungeon_id: DungeonId,
    pub outcome: RunOutcome,
    pub completion_time: Duration,
    /// Only awarded on victory in a dungeon with a par time.
    pub medal: Option<Medal>,
    pub loot: Loot,
    pub stats: RunStats,
    /// Index of the floor the party was on, plus one.
    pub floors_cleared: u32,
    pub boss_defeated: bool,
}

// ---------------------------------------------------------------------------
// DungeonRun
// ---------------------------------------------------------------------------

/// One party's attempt at one dungeon.
///
/// Runs are owned by the [`DungeonManager`](crate::DungeonManager) and only
/// change through its operations; callers get shared references or clones.
pub struct DungeonRun<G: DungeonHooks> {
    pub id: RunId,
    pub game_id: GameId,
    /// Snapshot of the template taken at start. Re-registering the dungeon
    /// does not affect runs already in progress.
    pub dungeon: Arc<DungeonType>,
    pub difficulty: Difficulty,
    pub party: DungeonParty,
    pub status: RunStatus,
    pub current_room: RoomId,
    pub current_floor: u32,
    pub last_checkpoint: Option<RoomId>,
    pub revives_used: u32,
    /// Loot collected so far.
    pub loot: Loot,
    pub stats: RunStats,
    /// Game-defined scratch data.
    pub data: G::RunData,
    /// Set once the run has ended.
    pub result: Option<DungeonResult>,
    pub(crate) rooms: Vec<RoomState<G>>,
    started_at: Instant,
}

impl<G: DungeonHooks> DungeonRun<G> {
    /// Creates a run with the entry room available and every other room
    /// locked.
    pub(crate) fn new(
        id: RunId,
        game_id: GameId,
        dungeon: Arc<DungeonType>,
        party: DungeonParty,
        difficulty: Difficulty,
    ) -> Self {
        let entry = dungeon.layout.entry_room.clone();
        let rooms = dungeon
            .layout
            .rooms
            .iter()
            .map(|room| {
                let status = if room.id == entry {
                    RoomStatus::Available
                } else {
                    RoomStatus::Locked
                };
                RoomState::new(room.id.clone(), status)
            })
            .collect();

        Self {
            id,
            game_id,
            dungeon,
            difficulty,
            party,
            status: RunStatus::Active,
            current_room: entry,
            current_floor: 0,
            last_checkpoint: None,
            revives_used: 0,
            loot: Loot::default(),
            stats: RunStats::default(),
            data: G::RunData::default(),
            result: None,
            rooms,
            started_at: Instant::now(),
        }
    }

    pub fn dungeon_id(&self) -> &DungeonId {
        &self.dungeon.id
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&RoomState<G>> {
        self.rooms.iter().find(|r| &r.room_id == room_id)
    }

    /// All room states, in layout order.
    pub fn rooms(&self) -> &[RoomState<G>] {
        &self.rooms
    }

    pub(crate) fn room_mut(&mut self, room_id: &RoomId) -> Option<&mut RoomState<G>> {
        self.rooms.iter_mut().find(|r| &r.room_id == room_id)
    }

    /// Time since the run started, frozen at the completion time once the
    /// run has ended.
    pub fn elapsed(&self) -> Duration {
        match &self.result {
            Some(result) => result.completion_time,
            None => self.started_at.elapsed(),
        }
    }

    /// Monotonic instant the run was created.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

impl<G: DungeonHooks> Clone for DungeonRun<G> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            game_id: self.game_id.clone(),
            dungeon: Arc::clone(&self.dungeon),
            difficulty: self.difficulty,
            party: self.party.clone(),
            status: self.status,
            current_room: self.current_room.clone(),
            current_floor: self.current_floor,
            last_checkpoint: self.last_checkpoint.clone(),
            revives_used: self.revives_used,
            loot: self.loot.clone(),
            stats: self.stats.clone(),
            data: self.data.clone(),
            result: self.result.clone(),
            rooms: self.rooms.clone(),
            started_at: self.started_at,
        }
    }
}

impl<G: DungeonHooks> fmt::Debug for DungeonRun<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DungeonRun")
            .field("id", &self.id)
            .field("dungeon", &self.dungeon.id)
            .field("status", &self.status)
            .field("current_room", &self.current_room)
            .field("current_floor", &self.current_floor)
            .field("members", &self.party.members)
            .field("rooms", &self.rooms)
            .finish_non_exhaustive()
    }
}
