//! The `DungeonHooks` trait: the extension point for hosting games.
//!
//! The engine owns the room graph and the run bookkeeping. Everything that
//! is *content* (which monsters show up, what drops, what an event room
//! says) comes from the game through this trait.
//!
//! Two methods are required: [`DungeonHooks::generate_encounter`] and
//! [`DungeonHooks::generate_loot`]. Every other method has a default body
//! that implements the documented default policy, so the engine never has to
//! ask "did the game supply this hook?".

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use delve_types::{
    Difficulty, DungeonId, DungeonParty, DungeonType, Loot, MemberId,
    RoomDefinition, RunId,
};
use serde::{Deserialize, Serialize};

use crate::{DungeonError, DungeonResult, DungeonRun, WipeContext, WipeDecision};

// ---------------------------------------------------------------------------
// Hook parameters
// ---------------------------------------------------------------------------

/// Context handed to content generators for one room.
#[derive(Debug, Clone, Copy)]
pub struct RoomParams<'a> {
    pub run_id: RunId,
    pub dungeon: &'a DungeonType,
    pub room: &'a RoomDefinition,
    pub difficulty: Difficulty,
    pub party: &'a DungeonParty,
}

/// Context for a loot roll. `encounter` is set when the loot is the reward
/// for a won fight and `None` for treasure rooms.
#[derive(Debug, Clone, Copy)]
pub struct LootParams<'a, E> {
    pub room: RoomParams<'a>,
    pub encounter: Option<&'a E>,
}

/// Context for resolving a choice in an event room.
#[derive(Debug, Clone, Copy)]
pub struct EventChoiceParams<'a, V> {
    pub run_id: RunId,
    pub room: &'a RoomDefinition,
    pub event: &'a V,
    pub choice: usize,
    pub party: &'a DungeonParty,
}

/// Who is asking which dungeons they can enter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub player_id: MemberId,
    pub level: u32,
    pub party_id: Option<String>,
    /// Dungeons the player has unlocked through progression, if the game
    /// tracks that.
    pub unlocked: Option<Vec<DungeonId>>,
}

// ---------------------------------------------------------------------------
// Event outcomes
// ---------------------------------------------------------------------------

/// A cost imposed by an event choice.
///
/// The engine only reports penalties. Applying them is up to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPenalty {
    /// Lose this percentage of current HP.
    HpLoss { percent: u32 },
    GoldLoss { amount: u64 },
    Debuff { id: String },
}

/// Result of choosing an option in an event room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub success: bool,
    pub message: Option<String>,
    /// Merged into the run's collected loot.
    pub rewards: Option<Loot>,
    pub penalties: Vec<EventPenalty>,
}

impl EventOutcome {
    /// A successful outcome with no rewards or penalties.
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// DungeonHooks
// ---------------------------------------------------------------------------

/// The trait hosting games implement.
///
/// Associated types describe the game's content:
/// - `Encounter`: what a combat room contains (cached per room per run)
/// - `Event`: what an event room presents (cached per room per run)
/// - `RunData`: free-form scratch data stored on every run
///
/// Async hooks are written as `fn … -> impl Future<Output = …> + Send` so a
/// manager can be moved into a spawned task. Implementors can still write
/// them as plain `async fn`.
///
/// # Example
///
/// ```rust
/// use delve_engine::{DungeonError, DungeonHooks, LootParams, RoomParams};
/// use delve_types::Loot;
///
/// struct Goblins;
///
/// impl DungeonHooks for Goblins {
///     type Encounter = u32; // number of goblins
///     type Event = ();
///     type RunData = ();
///
///     async fn generate_encounter(
///         &self,
///         params: RoomParams<'_>,
///     ) -> Result<u32, DungeonError> {
///         Ok(params.party.size() as u32 * 2)
///     }
///
///     async fn generate_loot(
///         &self,
///         params: LootParams<'_, u32>,
///     ) -> Result<Loot, DungeonError> {
///         let goblins = params.encounter.copied().unwrap_or(0);
///         Ok(Loot::gold(u64::from(goblins) * 5))
///     }
/// }
/// ```
pub trait DungeonHooks: Sized + Send + Sync + 'static {
    type Encounter: Send + Sync + Clone + fmt::Debug + 'static;
    type Event: Send + Sync + Clone + fmt::Debug + 'static;
    type RunData: Send + Sync + Clone + Default + 'static;

    /// Builds the encounter for a combat, elite, miniboss or boss room.
    ///
    /// Called at most once per room per run; the result is cached and
    /// reused when the party re-enters the room after a wipe.
    fn generate_encounter(
        &self,
        params: RoomParams<'_>,
    ) -> impl Future<Output = Result<Self::Encounter, DungeonError>> + Send;

    /// Rolls loot for a won fight or a treasure room.
    fn generate_loot(
        &self,
        params: LootParams<'_, Self::Encounter>,
    ) -> impl Future<Output = Result<Loot, DungeonError>> + Send;

    /// HP restored to every living member in a rest room.
    ///
    /// Default: half of the party's average max HP.
    fn rest_healing(&self, party: &DungeonParty, _room: &RoomDefinition) -> u32 {
        party.average_max_hp() / 2
    }

    /// Builds the event for an event room. Default: no event.
    ///
    /// With no event the room still puts the run `in_event`; the game is
    /// expected to finish it with `complete_room`.
    fn generate_event(
        &self,
        _params: RoomParams<'_>,
    ) -> impl Future<Output = Result<Option<Self::Event>, DungeonError>> + Send {
        async { Ok(None) }
    }

    /// Resolves the party's choice in an event room.
    ///
    /// Default: always succeeds with no rewards or penalties.
    fn resolve_event_choice(
        &self,
        _params: EventChoiceParams<'_, Self::Event>,
    ) -> impl Future<Output = Result<EventOutcome, DungeonError>> + Send {
        async { Ok(EventOutcome::success()) }
    }

    /// Extra admission checks (gear score, lockouts, …).
    ///
    /// Runs after the engine's own checks. Returning `Err(reason)` rejects
    /// the party. Default: accept all.
    fn validate_party(
        &self,
        _dungeon: &DungeonType,
        _party: &DungeonParty,
    ) -> impl Future<Output = Result<(), String>> + Send {
        async { Ok(()) }
    }

    /// Decides what happens after a party wipe.
    ///
    /// Default: continue from the last checkpoint with loot lost, or end the
    /// run if no checkpoint was reached. See
    /// [`WipeDecision::checkpoint_policy`].
    fn resolve_wipe(
        &self,
        ctx: WipeContext<'_>,
    ) -> impl Future<Output = Result<WipeDecision, DungeonError>> + Send {
        let decision = WipeDecision::checkpoint_policy(ctx.last_checkpoint);
        async move { Ok(decision) }
    }

    /// Lists the dungeons a player may enter.
    ///
    /// Default: every registered dungeon whose level band contains
    /// `query.level`.
    fn available_dungeons(
        &self,
        query: &AvailabilityQuery,
        registered: Vec<Arc<DungeonType>>,
    ) -> impl Future<Output = Result<Vec<Arc<DungeonType>>, DungeonError>> + Send {
        let found = level_gate(query.level, registered);
        async move { Ok(found) }
    }

    /// Called after a run is created and announced.
    fn on_dungeon_start(&self, _run: &DungeonRun<Self>) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Called after a room is marked completed, before a boss kill ends
    /// the run.
    fn on_room_complete(
        &self,
        _run: &DungeonRun<Self>,
        _room: &RoomDefinition,
    ) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Called once when a run ends, with its final result.
    fn on_dungeon_end(
        &self,
        _run: &DungeonRun<Self>,
        _result: &DungeonResult,
    ) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Keeps the dungeons whose level band contains `level`.
pub fn level_gate(level: u32, dungeons: Vec<Arc<DungeonType>>) -> Vec<Arc<DungeonType>> {
    dungeons
        .into_iter()
        .filter(|d| d.accepts_level(level))
        .collect()
}
