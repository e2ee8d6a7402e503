//! Manager configuration and the run/room state machines.

use std::fmt;

use delve_types::GameId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ManagerConfig
// ---------------------------------------------------------------------------

/// Configuration for one [`DungeonManager`](crate::DungeonManager).
///
/// Deserializes with defaults for missing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Identity of the hosting game. Stamped on every emitted event.
    pub game_id: GameId,

    /// Bounded command channel size used by [`spawn_manager`](crate::spawn_manager).
    pub command_channel_size: usize,
}

impl ManagerConfig {
    /// Default configuration for `game_id`.
    pub fn for_game(game_id: impl Into<GameId>) -> Self {
        Self {
            game_id: game_id.into(),
            ..Self::default()
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            game_id: GameId::from("default"),
            command_channel_size: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// RunStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a run.
///
/// ```text
///            ┌──── enter combat room ───→ InCombat ──┐
/// Active ────┤                                       ├──→ Active
///            └──── enter event room ────→ InEvent ───┘
///
/// any ongoing state ──(end_run)──→ Victory | Defeat | Fled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Active,
    InCombat,
    InEvent,
    Victory,
    Defeat,
    Fled,
}

impl RunStatus {
    /// Returns `true` while the run has not ended.
    pub fn is_ongoing(&self) -> bool {
        matches!(self, Self::Active | Self::InCombat | Self::InEvent)
    }

    pub fn is_ended(&self) -> bool {
        !self.is_ongoing()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::InCombat => write!(f, "in_combat"),
            Self::InEvent => write!(f, "in_event"),
            Self::Victory => write!(f, "victory"),
            Self::Defeat => write!(f, "defeat"),
            Self::Fled => write!(f, "fled"),
        }
    }
}

/// How a run ended. The terminal subset of [`RunStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Victory,
    Defeat,
    Fled,
}

impl From<RunOutcome> for RunStatus {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Victory => Self::Victory,
            RunOutcome::Defeat => Self::Defeat,
            RunOutcome::Fled => Self::Fled,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        RunStatus::from(*self).fmt(f)
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The state of one room within one run.
///
/// Status only moves forward:
///
/// ```text
/// Locked → Available → Entered → Completed
///                         ↑  ↓
///                        Failed   (wipe, then retry)
/// ```
///
/// A failed room can be entered again, but no room ever returns to
/// `Locked` or `Available`, and `Completed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Locked,
    Available,
    Entered,
    Completed,
    Failed,
}

impl RoomStatus {
    /// Returns `true` if the transition `self → target` is allowed.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Locked, Self::Available)
                | (Self::Available, Self::Entered)
                | (Self::Entered, Self::Completed)
                | (Self::Entered, Self::Failed)
                | (Self::Failed, Self::Entered)
        )
    }

    /// Rooms the party may move into (shown by `available_rooms`).
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Available | Self::Completed)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Available => write!(f, "available"),
            Self::Entered => write!(f, "entered"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
