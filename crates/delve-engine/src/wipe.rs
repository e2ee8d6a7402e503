//! Party wipe resolution.
//!
//! When a fight is lost the game decides, through
//! [`DungeonHooks::resolve_wipe`](crate::DungeonHooks::resolve_wipe), whether
//! the party may continue. The engine then applies that decision here.

use delve_types::{DungeonParty, DungeonType, RoomId, RunId};
use serde::{Deserialize, Serialize};

use crate::{DungeonHooks, DungeonResult, DungeonRun, RoomStatus, RunStatus};

/// What happens to collected loot when the party respawns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootPolicy {
    Keep,
    #[default]
    Lose,
}

/// The game's verdict on a wipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeDecision {
    pub can_continue: bool,
    /// Where the party respawns. Ignored unless `can_continue` is set.
    pub respawn_room: Option<RoomId>,
    pub loot_policy: LootPolicy,
}

impl WipeDecision {
    /// The run ends in defeat.
    pub fn end_run() -> Self {
        Self {
            can_continue: false,
            respawn_room: None,
            loot_policy: LootPolicy::Keep,
        }
    }

    /// The party respawns at `room` and loses its collected loot.
    pub fn respawn_at(room: impl Into<RoomId>) -> Self {
        Self {
            can_continue: true,
            respawn_room: Some(room.into()),
            loot_policy: LootPolicy::Lose,
        }
    }

    pub fn keep_loot(mut self) -> Self {
        self.loot_policy = LootPolicy::Keep;
        self
    }

    /// The default policy: respawn at the last checkpoint with loot lost, or
    /// end the run if none was reached.
    pub fn checkpoint_policy(last_checkpoint: Option<&RoomId>) -> Self {
        match last_checkpoint {
            Some(room) => Self::respawn_at(room.clone()),
            None => Self::end_run(),
        }
    }

    /// Returns the respawn room when the decision lets the run continue.
    pub fn respawn(&self) -> Option<&RoomId> {
        if self.can_continue {
            self.respawn_room.as_ref()
        } else {
            None
        }
    }
}

/// Context handed to the wipe hook.
#[derive(Debug, Clone, Copy)]
pub struct WipeContext<'a> {
    pub run_id: RunId,
    pub dungeon: &'a DungeonType,
    pub party: &'a DungeonParty,
    /// The room the party died in.
    pub failed_room: &'a RoomId,
    pub last_checkpoint: Option<&'a RoomId>,
    /// Deaths including this one.
    pub death_count: u32,
    pub revives_used: u32,
}

/// Returned by `combat_defeat`.
#[derive(Debug, Clone, PartialEq)]
pub struct WipeOutcome {
    pub decision: WipeDecision,
    /// Present when the wipe ended the run.
    pub result: Option<DungeonResult>,
}

/// Records the wipe on `run` and, if the decision allows it, reactivates
/// the run. The party only moves when the decision names a respawn room.
///
/// `respawn_floor` must be the floor of the decision's respawn room. Ending
/// the run is left to the caller.
pub(crate) fn apply<G: DungeonHooks>(
    run: &mut DungeonRun<G>,
    failed_room: &RoomId,
    decision: &WipeDecision,
    respawn_floor: Option<u32>,
) {
    if let Some(state) = run.room_mut(failed_room) {
        state.status = RoomStatus::Failed;
    }
    run.stats.death_count += 1;

    if !decision.can_continue {
        return;
    }

    run.status = RunStatus::Active;
    if let (Some(room), Some(floor)) = (decision.respawn(), respawn_floor) {
        run.current_room = room.clone();
        run.current_floor = floor;
    }
    if decision.loot_policy == LootPolicy::Lose {
        run.loot = Default::default();
    }
    run.revives_used += 1;
}
