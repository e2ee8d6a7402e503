//! Dungeon run engine for Delve.
//!
//! A [`DungeonManager`] admits parties into registered dungeons, walks them
//! through the room graph, resolves fights, wipes and event choices, and
//! produces a [`DungeonResult`] with loot, stats and a time medal when the
//! run ends.
//!
//! # Key types
//!
//! - [`DungeonHooks`]: the trait hosting games implement for content
//! - [`DungeonManager`]: owns runs and enforces one run per member
//! - [`ManagerHandle`]: send commands to a manager running as a task
//! - [`DungeonRun`], [`RoomState`]: per-run state
//! - [`RunStatus`], [`RoomStatus`]: lifecycle state machines
//! - [`DungeonEvent`]: lifecycle notifications, see [`DungeonManager::subscribe`]

#![allow(async_fn_in_trait)]

mod actor;
mod config;
mod error;
mod events;
mod hooks;
mod manager;
mod registry;
mod rewards;
mod run;
mod wipe;

pub use actor::{spawn_manager, ManagerHandle};
pub use config::{ManagerConfig, RoomStatus, RunOutcome, RunStatus};
pub use error::DungeonError;
pub use events::{DungeonEvent, EventEnvelope, EventReceiver, EventSender};
pub use hooks::{
    level_gate, AvailabilityQuery, DungeonHooks, EventChoiceParams, EventOutcome,
    EventPenalty, LootParams, RoomParams,
};
pub use manager::{DungeonManager, RoomCompletion};
pub use registry::DungeonRegistry;
pub use rewards::Medal;
pub use run::{CombatResult, DungeonResult, DungeonRun, RoomState, RunStats};
pub use wipe::{LootPolicy, WipeContext, WipeDecision, WipeOutcome};
