//! Lifecycle events emitted by the manager.

use std::fmt;

use delve_types::{Difficulty, DungeonId, GameId, Loot, MemberId, RoomId, RoomType, RunId};
use tokio::sync::mpsc;

use crate::{CombatResult, DungeonHooks, DungeonResult, EventOutcome, RoomState, WipeDecision};

/// Something that happened to a run.
pub enum DungeonEvent<G: DungeonHooks> {
    RunStarted {
        dungeon_id: DungeonId,
        members: Vec<MemberId>,
        difficulty: Difficulty,
    },
    /// The party moved into a room. Carries the room state after entry,
    /// including any freshly generated content.
    RoomEntered {
        room: RoomState<G>,
        room_type: RoomType,
    },
    RoomCompleted {
        room_id: RoomId,
        /// Rooms that went from locked to available.
        unlocked: Vec<RoomId>,
        loot: Loot,
    },
    EncounterWon {
        room_id: RoomId,
        loot: Loot,
        combat: CombatResult,
    },
    PartyWiped {
        room_id: RoomId,
        decision: WipeDecision,
    },
    EventResolved {
        room_id: RoomId,
        choice: usize,
        outcome: EventOutcome,
    },
    RunCompleted {
        result: DungeonResult,
    },
}

impl<G: DungeonHooks> DungeonEvent<G> {
    /// Short snake_case name, handy for logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::RoomEntered { .. } => "room_entered",
            Self::RoomCompleted { .. } => "room_completed",
            Self::EncounterWon { .. } => "encounter_won",
            Self::PartyWiped { .. } => "party_wiped",
            Self::EventResolved { .. } => "event_resolved",
            Self::RunCompleted { .. } => "run_completed",
        }
    }
}

impl<G: DungeonHooks> Clone for DungeonEvent<G> {
    fn clone(&self) -> Self {
        match self {
            Self::RunStarted {
                dungeon_id,
                members,
                difficulty,
            } => Self::RunStarted {
                dungeon_id: dungeon_id.clone(),
                members: members.clone(),
                difficulty: *difficulty,
            },
            Self::RoomEntered { room, room_type } => Self::RoomEntered {
                room: room.clone(),
                room_type: *room_type,
            },
            Self::RoomCompleted {
                room_id,
                unlocked,
                loot,
            } => Self::RoomCompleted {
                room_id: room_id.clone(),
                unlocked: unlocked.clone(),
                loot: loot.clone(),
            },
            Self::EncounterWon {
                room_id,
                loot,
                combat,
            } => Self::EncounterWon {
                room_id: room_id.clone(),
                loot: loot.clone(),
                combat: *combat,
            },
            Self::PartyWiped { room_id, decision } => Self::PartyWiped {
                room_id: room_id.clone(),
                decision: decision.clone(),
            },
            Self::EventResolved {
                room_id,
                choice,
                outcome,
            } => Self::EventResolved {
                room_id: room_id.clone(),
                choice: *choice,
                outcome: outcome.clone(),
            },
            Self::RunCompleted { result } => Self::RunCompleted {
                result: result.clone(),
            },
        }
    }
}

impl<G: DungeonHooks> fmt::Debug for DungeonEvent<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunStarted {
                dungeon_id,
                members,
                difficulty,
            } => f
                .debug_struct("RunStarted")
                .field("dungeon_id", dungeon_id)
                .field("members", members)
                .field("difficulty", difficulty)
                .finish(),
            Self::RoomEntered { room, room_type } => f
                .debug_struct("RoomEntered")
                .field("room", room)
                .field("room_type", room_type)
                .finish(),
            Self::RoomCompleted {
                room_id,
                unlocked,
                loot,
            } => f
                .debug_struct("RoomCompleted")
                .field("room_id", room_id)
                .field("unlocked", unlocked)
                .field("loot", loot)
                .finish(),
            Self::EncounterWon {
                room_id,
                loot,
                combat,
            } => f
                .debug_struct("EncounterWon")
                .field("room_id", room_id)
                .field("loot", loot)
                .field("combat", combat)
                .finish(),
            Self::PartyWiped { room_id, decision } => f
                .debug_struct("PartyWiped")
                .field("room_id", room_id)
                .field("decision", decision)
                .finish(),
            Self::EventResolved {
                room_id,
                choice,
                outcome,
            } => f
                .debug_struct("EventResolved")
                .field("room_id", room_id)
                .field("choice", choice)
                .field("outcome", outcome)
                .finish(),
            Self::RunCompleted { result } => f
                .debug_struct("RunCompleted")
                .field("result", result)
                .finish(),
        }
    }
}

/// An event tagged with the game and run it belongs to.
pub struct EventEnvelope<G: DungeonHooks> {
    pub game_id: GameId,
    pub run_id: RunId,
    pub event: DungeonEvent<G>,
}

impl<G: DungeonHooks> Clone for EventEnvelope<G> {
    fn clone(&self) -> Self {
        Self {
            game_id: self.game_id.clone(),
            run_id: self.run_id,
            event: self.event.clone(),
        }
    }
}

impl<G: DungeonHooks> fmt::Debug for EventEnvelope<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEnvelope")
            .field("game_id", &self.game_id)
            .field("run_id", &self.run_id)
            .field("event", &self.event)
            .finish()
    }
}

/// Channel sender for delivering events to a subscriber.
pub type EventSender<G> = mpsc::UnboundedSender<EventEnvelope<G>>;

/// Receiving end returned by `subscribe`.
pub type EventReceiver<G> = mpsc::UnboundedReceiver<EventEnvelope<G>>;
