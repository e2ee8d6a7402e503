//! # Delve
//!
//! Instanced dungeon runs for MMO game servers.
//!
//! A party enters a dungeon built from an author-defined room graph, clears
//! rooms (fights, events, rests, treasure), may wipe and respawn at a
//! checkpoint, and finishes with loot, stats and a time medal. The game
//! supplies content through the [`DungeonHooks`](prelude::DungeonHooks)
//! trait; Delve owns the bookkeeping.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use delve::prelude::*;
//!
//! # struct MyGame;
//! # impl DungeonHooks for MyGame {
//! #     type Encounter = ();
//! #     type Event = ();
//! #     type RunData = ();
//! #     async fn generate_encounter(&self, _: RoomParams<'_>) -> Result<(), DungeonError> { Ok(()) }
//! #     async fn generate_loot(&self, _: LootParams<'_, ()>) -> Result<Loot, DungeonError> { Ok(Loot::default()) }
//! # }
//! # async fn run() -> Result<(), DelveError> {
//! delve::init_tracing("info");
//!
//! let mut manager = DungeonManager::new(ManagerConfig::for_game("realm-1"), MyGame);
//! delve::register_catalog_file(&mut manager, "dungeons.json").await?;
//!
//! let handle = spawn_manager(manager);
//! let run_id = handle
//!     .start_run("cave", DungeonParty::new(["ana", "bo"]), Difficulty::Normal)
//!     .await?;
//! handle.enter_room(run_id, "entry").await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;
mod logging;

pub use catalog::{load_catalog, load_config, register_catalog_file};
pub use error::DelveError;
pub use logging::init_tracing;

pub use delve_engine as engine;
pub use delve_types as types;

/// Everything a hosting game usually needs.
pub mod prelude {
    pub use delve_engine::{
        spawn_manager, AvailabilityQuery, CombatResult, DungeonError, DungeonEvent,
        DungeonHooks, DungeonManager, DungeonResult, DungeonRun, EventChoiceParams,
        EventOutcome, EventPenalty, LootParams, LootPolicy, ManagerConfig, ManagerHandle,
        Medal, RoomParams, RoomState, RoomStatus, RunOutcome, RunStatus, WipeContext,
        WipeDecision,
    };
    pub use delve_types::{
        Difficulty, DungeonId, DungeonParty, DungeonType, Loot, MemberId, MemberState,
        RoomDefinition, RoomId, RoomLayout, RoomType, RunId,
    };

    pub use crate::DelveError;
}
