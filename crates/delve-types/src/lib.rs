//! Shared data types for Delve.
//!
//! This crate holds the static side of the dungeon system:
//!
//! - **Identity** ([`RunId`], [`MemberId`], [`DungeonId`], [`RoomId`],
//!   [`GameId`]) and run [`Difficulty`].
//! - **Templates** ([`DungeonType`], [`RoomLayout`], [`RoomDefinition`]):
//!   the author-defined room graph.
//! - **Parties** ([`DungeonParty`], [`MemberState`]).
//! - **Loot** ([`Loot`], [`LootItem`]) and how bundles merge.
//! - **Catalogs** ([`parse_catalog`]): loading templates from JSON.
//!
//! It knows nothing about runs in progress; that is `delve-engine`.

mod dungeon;
mod error;
mod loot;
mod party;
mod types;

#[cfg(feature = "json")]
mod catalog;

#[cfg(feature = "json")]
pub use catalog::parse_catalog;
pub use dungeon::{DungeonType, RoomDefinition, RoomLayout, RoomType};
pub use error::DefinitionError;
pub use loot::{Loot, LootItem};
pub use party::{DungeonParty, MemberState};
pub use types::{Difficulty, DungeonId, GameId, MemberId, RoomId, RunId};
