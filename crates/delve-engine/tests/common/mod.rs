//! Shared fixtures: a mock game and two small dungeons.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use delve_engine::{
    DungeonError, DungeonHooks, DungeonManager, DungeonResult, DungeonRun,
    EventChoiceParams, EventOutcome, EventPenalty, LootParams, ManagerConfig,
    RoomParams, WipeContext, WipeDecision,
};
use delve_types::{
    DungeonParty, DungeonType, Loot, RoomDefinition, RoomId, RoomLayout, RoomType,
};

// =========================================================================
// Mock game: fixed loot, numbered encounters, one shrine event.
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub room: RoomId,
    /// Order in which the encounter was generated, starting at 0.
    pub serial: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shrine {
    pub choices: Vec<&'static str>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notes {
    pub visits: u32,
}

#[derive(Default)]
pub struct TestHooks {
    pub encounters: AtomicUsize,
    pub rooms_completed: AtomicUsize,
    pub runs_started: AtomicUsize,
    pub runs_ended: AtomicUsize,
    pub fail_encounters: AtomicBool,
    pub reject_parties: Option<String>,
    /// Replaces the checkpoint policy when set.
    pub wipe_decision: Option<WipeDecision>,
}

impl TestHooks {
    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject_parties: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn wiping(decision: WipeDecision) -> Self {
        Self {
            wipe_decision: Some(decision),
            ..Self::default()
        }
    }
}

pub const FIGHT_GOLD: u64 = 10;
pub const TREASURE_GOLD: u64 = 50;
pub const SHRINE_GOLD: u64 = 25;

impl DungeonHooks for TestHooks {
    type Encounter = Encounter;
    type Event = Shrine;
    type RunData = Notes;

    async fn generate_encounter(&self, params: RoomParams<'_>) -> Result<Encounter, DungeonError> {
        if self.fail_encounters.load(Ordering::SeqCst) {
            return Err(DungeonError::Hook("encounter table offline".into()));
        }
        Ok(Encounter {
            room: params.room.id.clone(),
            serial: self.encounters.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn generate_loot(&self, params: LootParams<'_, Encounter>) -> Result<Loot, DungeonError> {
        Ok(match params.encounter {
            Some(_) => Loot::gold(FIGHT_GOLD).with_experience(5),
            None => Loot::gold(TREASURE_GOLD).with_item("gem", 1),
        })
    }

    async fn generate_event(&self, _params: RoomParams<'_>) -> Result<Option<Shrine>, DungeonError> {
        Ok(Some(Shrine {
            choices: vec!["pray", "desecrate"],
        }))
    }

    async fn resolve_event_choice(
        &self,
        params: EventChoiceParams<'_, Shrine>,
    ) -> Result<EventOutcome, DungeonError> {
        match params.choice {
            0 => Ok(EventOutcome {
                success: true,
                message: Some("the shrine glows".into()),
                rewards: Some(Loot::gold(SHRINE_GOLD)),
                penalties: Vec::new(),
            }),
            1 => Ok(EventOutcome {
                success: false,
                message: None,
                rewards: None,
                penalties: vec![EventPenalty::HpLoss { percent: 10 }],
            }),
            other => Err(DungeonError::Hook(format!("shrine has no choice {other}"))),
        }
    }

    async fn validate_party(&self, _dungeon: &DungeonType, _party: &DungeonParty) -> Result<(), String> {
        match &self.reject_parties {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }

    async fn resolve_wipe(&self, ctx: WipeContext<'_>) -> Result<WipeDecision, DungeonError> {
        Ok(match &self.wipe_decision {
            Some(decision) => decision.clone(),
            None => WipeDecision::checkpoint_policy(ctx.last_checkpoint),
        })
    }

    async fn on_dungeon_start(&self, _run: &DungeonRun<Self>) {
        self.runs_started.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_room_complete(&self, _run: &DungeonRun<Self>, _room: &RoomDefinition) {
        self.rooms_completed.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_dungeon_end(&self, _run: &DungeonRun<Self>, _result: &DungeonResult) {
        self.runs_ended.fetch_add(1, Ordering::SeqCst);
    }
}

/// Implements only the required hooks, so every default policy applies.
pub struct MinimalHooks;

impl DungeonHooks for MinimalHooks {
    type Encounter = ();
    type Event = ();
    type RunData = ();

    async fn generate_encounter(&self, _params: RoomParams<'_>) -> Result<(), DungeonError> {
        Ok(())
    }

    async fn generate_loot(&self, _params: LootParams<'_, ()>) -> Result<Loot, DungeonError> {
        Ok(Loot::gold(1))
    }
}

// =========================================================================
// Dungeons
// =========================================================================

/// entry → r1 (combat) → boss. Par time 100s.
pub fn cave() -> DungeonType {
    DungeonType {
        id: "cave".into(),
        name: "Cave".into(),
        min_level: 1,
        max_level: 10,
        min_party_size: 1,
        max_party_size: 4,
        difficulty: 1,
        floors: 1,
        layout: RoomLayout {
            rooms: vec![
                RoomDefinition::new("entry", RoomType::Entry).connect(["r1"]),
                RoomDefinition::new("r1", RoomType::Combat).connect(["boss"]),
                RoomDefinition::new("boss", RoomType::Boss),
            ],
            entry_room: "entry".into(),
            boss_room: "boss".into(),
            linear: true,
        },
        par_time_ms: Some(100_000),
    }
}

/// Two floors with every room type:
///
/// ```text
/// floor 0: entry ─┬→ vault (treasure, secret) ─┐
///                 └→ hall (combat, checkpoint) ←┘ → camp (rest)
/// floor 1: shrine (event) → lich (boss)
/// ```
pub fn crypt() -> DungeonType {
    DungeonType {
        id: "crypt".into(),
        name: "Crypt".into(),
        min_level: 10,
        max_level: 20,
        min_party_size: 1,
        max_party_size: 3,
        difficulty: 3,
        floors: 2,
        layout: RoomLayout {
            rooms: vec![
                RoomDefinition::new("entry", RoomType::Entry).connect(["vault", "hall"]),
                RoomDefinition::new("vault", RoomType::Treasure)
                    .connect(["hall"])
                    .secret(),
                RoomDefinition::new("hall", RoomType::Combat)
                    .connect(["camp"])
                    .checkpoint(),
                RoomDefinition::new("camp", RoomType::Rest).connect(["shrine"]),
                RoomDefinition::new("shrine", RoomType::Event)
                    .connect(["lich"])
                    .on_floor(1),
                RoomDefinition::new("lich", RoomType::Boss).on_floor(1),
            ],
            entry_room: "entry".into(),
            boss_room: "lich".into(),
            linear: false,
        },
        par_time_ms: None,
    }
}

pub fn manager_with<G: DungeonHooks>(hooks: G) -> DungeonManager<G> {
    let mut manager = DungeonManager::new(ManagerConfig::for_game("test"), hooks);
    manager.register_dungeon_type(cave()).unwrap();
    manager.register_dungeon_type(crypt()).unwrap();
    manager
}

pub fn manager() -> DungeonManager<TestHooks> {
    manager_with(TestHooks::default())
}

pub fn party(members: &[&str]) -> DungeonParty {
    DungeonParty::new(members.iter().copied())
}

pub fn rid(id: &str) -> RoomId {
    RoomId::from(id)
}
