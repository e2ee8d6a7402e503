//! Identity types and run difficulty.
//!
//! Every identifier is a "newtype wrapper" so that a `RoomId` can never be
//! passed where a `DungeonId` is expected, even though both are strings
//! underneath. `#[serde(transparent)]` keeps the JSON form a plain string
//! (or number for [`RunId`]).

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// String identifiers
// ---------------------------------------------------------------------------

/// Declares a string-backed identifier with `Display`, `From<&str>` and
/// `From<String>` impls.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Identity of a party member (a player or companion).
    MemberId
}

string_id! {
    /// Identity of a dungeon template in the registry.
    DungeonId
}

string_id! {
    /// Identity of a room within one dungeon layout.
    RoomId
}

string_id! {
    /// Identity of the hosting game. One engine instance exists per game.
    GameId
}

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A unique identifier for one dungeon run.
///
/// Run ids are allocated by a counter owned by each engine instance, so two
/// games hosted in the same process never share a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// The difficulty a run is started at.
///
/// Hooks receive this when generating encounters and loot; the engine itself
/// attaches no behavior to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Heroic,
    Mythic,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Heroic => write!(f, "heroic"),
            Self::Mythic => write!(f, "mythic"),
        }
    }
}
