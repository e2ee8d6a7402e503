use delve::prelude::*;
use rand::Rng;

// ---------------------------------------------------------------------------
// Game content
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Pack {
    pub monsters: Vec<&'static str>,
    pub strength: u32,
}

#[derive(Clone, Debug)]
pub struct Riddle {
    pub prompt: &'static str,
    pub answers: [&'static str; 2],
    pub correct: usize,
}

const MONSTERS: [&str; 4] = ["goblin", "cave bat", "slime", "kobold"];
const MAX_REVIVES: u32 = 2;

/// Rolls everything with the thread RNG. Nothing here is persisted.
struct CaveGame;

impl DungeonHooks for CaveGame {
    type Encounter = Pack;
    type Event = Riddle;
    type RunData = ();

    async fn generate_encounter(&self, params: RoomParams<'_>) -> Result<Pack, DungeonError> {
        let mut rng = rand::rng();
        let (count, per_monster) = match params.room.kind {
            RoomType::Boss => (1, 40),
            RoomType::Miniboss | RoomType::Elite => (1, 25),
            _ => (rng.random_range(2..=4), 6),
        };
        let scale = match params.difficulty {
            Difficulty::Normal => 1,
            Difficulty::Heroic => 2,
            Difficulty::Mythic => 3,
        };
        let monsters = (0..count)
            .map(|_| MONSTERS[rng.random_range(0..MONSTERS.len())])
            .collect();
        Ok(Pack {
            monsters,
            strength: count * per_monster * scale,
        })
    }

    async fn generate_loot(&self, params: LootParams<'_, Pack>) -> Result<Loot, DungeonError> {
        let mut rng = rand::rng();
        let loot = match params.encounter {
            Some(pack) => {
                let loot = Loot::gold(u64::from(pack.strength) * 3)
                    .with_experience(u64::from(pack.strength) * 5);
                if rng.random_bool(0.3) {
                    loot.with_item("health-potion", 1)
                } else {
                    loot
                }
            }
            None => Loot::gold(rng.random_range(20..=60)).with_item("old-coin", 1),
        };
        Ok(loot)
    }

    async fn generate_event(&self, _params: RoomParams<'_>) -> Result<Option<Riddle>, DungeonError> {
        Ok(Some(Riddle {
            prompt: "What has roots nobody sees?",
            answers: ["a mountain", "a tree"],
            correct: 0,
        }))
    }

    async fn resolve_event_choice(
        &self,
        params: EventChoiceParams<'_, Riddle>,
    ) -> Result<EventOutcome, DungeonError> {
        let riddle = params.event;
        let Some(answer) = riddle.answers.get(params.choice) else {
            return Err(DungeonError::Hook(format!("no answer {}", params.choice)));
        };
        if params.choice == riddle.correct {
            Ok(EventOutcome {
                success: true,
                message: Some(format!("\"{answer}\" is right")),
                rewards: Some(Loot::gold(40).with_experience(25)),
                penalties: Vec::new(),
            })
        } else {
            Ok(EventOutcome {
                success: false,
                message: Some(format!("\"{answer}\" is wrong")),
                rewards: None,
                penalties: vec![EventPenalty::HpLoss { percent: 15 }],
            })
        }
    }

    async fn resolve_wipe(&self, ctx: WipeContext<'_>) -> Result<WipeDecision, DungeonError> {
        if ctx.revives_used >= MAX_REVIVES {
            return Ok(WipeDecision::end_run());
        }
        Ok(WipeDecision::checkpoint_policy(ctx.last_checkpoint))
    }
}

const CATALOG: &str = r#"[
    {
        "id": "cave",
        "name": "Mossy Cave",
        "min_level": 1, "max_level": 10,
        "min_party_size": 1, "max_party_size": 4,
        "par_time_ms": 100000,
        "layout": {
            "entry_room": "entry", "boss_room": "boss", "linear": true,
            "rooms": [
                { "id": "entry", "type": "entry", "connections": ["r1"] },
                { "id": "r1", "type": "combat", "connections": ["boss"], "checkpoint": true },
                { "id": "boss", "type": "boss", "name": "Slime King" }
            ]
        }
    },
    {
        "id": "grotto",
        "name": "Whispering Grotto",
        "min_level": 5, "max_level": 20,
        "min_party_size": 2, "max_party_size": 5,
        "floors": 2,
        "par_time_ms": 300000,
        "layout": {
            "entry_room": "mouth", "boss_room": "heart",
            "rooms": [
                { "id": "mouth", "type": "entry", "connections": ["pool", "tunnel"] },
                { "id": "pool", "type": "treasure", "connections": ["tunnel"], "secret": true },
                { "id": "tunnel", "type": "combat", "connections": ["camp"], "checkpoint": true },
                { "id": "camp", "type": "rest", "connections": ["sphinx"] },
                { "id": "sphinx", "type": "event", "floor": 1, "connections": ["heart"] },
                { "id": "heart", "type": "boss", "floor": 1 }
            ]
        }
    }
]"#;

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

/// The next room to enter: the first one that is available or waiting for
/// a retry.
fn next_room(run: &DungeonRun<CaveGame>) -> Option<RoomId> {
    run.rooms()
        .iter()
        .find(|r| matches!(r.status, RoomStatus::Available | RoomStatus::Failed))
        .map(|r| r.room_id.clone())
}

/// Rolls a fight. `None` means the party wiped.
fn simulate_fight(party: &DungeonParty, pack: Option<&Pack>) -> Option<CombatResult> {
    let mut rng = rand::rng();
    let strength = pack.map_or(0, |p| p.strength);
    let power = party.size() as u32 * 20 + party.average_level;
    if rng.random_range(0..power + strength) >= power {
        return None;
    }
    Some(CombatResult {
        enemies_defeated: pack.map_or(0, |p| p.monsters.len() as u32),
        damage_dealt: u64::from(strength) * 10,
        damage_taken: rng.random_range(0..=u64::from(strength) * 4),
        healing_done: rng.random_range(0..=50),
    })
}

/// Plays a run to the end, making every decision at random.
async fn autopilot(handle: &ManagerHandle<CaveGame>, run_id: RunId) -> Result<DungeonResult, DungeonError> {
    loop {
        let run = handle
            .get_run(run_id)
            .await?
            .ok_or(DungeonError::RunNotFound(run_id))?;
        if let Some(result) = run.result {
            return Ok(result);
        }

        match run.status {
            RunStatus::Active => {
                let room = next_room(&run)
                    .ok_or_else(|| DungeonError::Hook("nowhere left to go".into()))?;
                handle.enter_room(run_id, room).await?;
            }
            RunStatus::InCombat => {
                let pack = run.room(&run.current_room).and_then(|r| r.encounter.as_ref());
                match simulate_fight(&run.party, pack) {
                    Some(combat) => {
                        handle.combat_victory(run_id, combat).await?;
                    }
                    None => {
                        handle.combat_defeat(run_id).await?;
                    }
                }
            }
            RunStatus::InEvent => {
                if let Some(riddle) = run.room(&run.current_room).and_then(|r| r.event.as_ref()) {
                    tracing::info!(%run_id, prompt = riddle.prompt, "the sphinx asks");
                }
                let choice = rand::rng().random_range(0..2);
                let outcome = handle.select_event_choice(run_id, choice).await?;
                tracing::info!(%run_id, success = outcome.success, message = ?outcome.message, "riddle answered");
            }
            RunStatus::Victory | RunStatus::Defeat | RunStatus::Fled => {
                return Err(DungeonError::InvalidState {
                    run: run_id,
                    status: run.status,
                    reason: "ended run has no result".into(),
                });
            }
        }
    }
}

fn party(members: &[&str], level: u32) -> DungeonParty {
    members
        .iter()
        .fold(DungeonParty::new(members.iter().copied()), |party, m| {
            party.with_state(*m, MemberState::healthy(100))
        })
        .with_average_level(level)
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), DelveError> {
    delve::init_tracing("info");

    let mut manager = DungeonManager::new(ManagerConfig::for_game("cave-run"), CaveGame);
    manager.register_catalog(CATALOG)?;
    let handle = spawn_manager(manager);

    let mut events = handle.subscribe().await?;
    let printer = tokio::spawn(async move {
        while let Some(envelope) = events.recv().await {
            tracing::debug!(run_id = %envelope.run_id, event = envelope.event.kind(), "dungeon event");
        }
    });

    let query = AvailabilityQuery {
        player_id: MemberId::from("ana"),
        level: 8,
        ..AvailabilityQuery::default()
    };
    for dungeon in handle.available_dungeons(query).await? {
        let members = ["ana", "bo", "cy"];
        let run_id = handle
            .start_run(dungeon.id.clone(), party(&members, 8), Difficulty::Normal)
            .await?;
        tracing::info!(%run_id, dungeon = %dungeon.name, "party enters");

        let result = autopilot(&handle, run_id).await?;
        tracing::info!(
            %run_id,
            outcome = %result.outcome,
            medal = ?result.medal,
            gold = result.loot.gold,
            rooms = result.stats.rooms_cleared,
            deaths = result.stats.death_count,
            "run finished"
        );
    }

    handle.shutdown().await?;
    let _ = printer.await;
    Ok(())
}
