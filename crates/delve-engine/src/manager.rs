//! Dungeon manager: admits parties, drives runs through the room graph and
//! produces results.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use delve_types::{
    Difficulty, DungeonId, DungeonParty, DungeonType, GameId, Loot, MemberId,
    RoomDefinition, RoomId, RoomType, RunId,
};
use tokio::sync::mpsc;

use crate::events::{EventEnvelope, EventReceiver, EventSender};
use crate::registry::DungeonRegistry;
use crate::rewards::medal_for;
use crate::{
    wipe, AvailabilityQuery, CombatResult, DungeonError, DungeonEvent,
    DungeonHooks, DungeonResult, DungeonRun, EventChoiceParams, EventOutcome,
    LootParams, ManagerConfig, RoomParams, RoomState, RoomStatus, RunOutcome,
    RunStatus, WipeContext, WipeOutcome,
};

/// Returned when a room is completed.
pub struct RoomCompletion<G: DungeonHooks> {
    /// The room's state after completion.
    pub room: RoomState<G>,
    /// Loot awarded for this room (already merged into the run).
    pub loot: Loot,
    /// Rooms unlocked by this completion.
    pub unlocked: Vec<RoomId>,
    /// Present when the room was the boss room and the run ended.
    pub result: Option<DungeonResult>,
}

impl<G: DungeonHooks> Clone for RoomCompletion<G> {
    fn clone(&self) -> Self {
        Self {
            room: self.room.clone(),
            loot: self.loot.clone(),
            unlocked: self.unlocked.clone(),
            result: self.result.clone(),
        }
    }
}

impl<G: DungeonHooks> fmt::Debug for RoomCompletion<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomCompletion")
            .field("room", &self.room)
            .field("loot", &self.loot)
            .field("unlocked", &self.unlocked)
            .field("result", &self.result)
            .finish()
    }
}

/// Content generated for a room before any state is touched.
enum Prepared<G: DungeonHooks> {
    Encounter(G::Encounter),
    Event(G::Event),
    Treasure(Loot),
    Healing(u32),
    Nothing,
}

/// Owns every run for one hosting game.
///
/// Operations take `&mut self`, so each one (including the hook calls it
/// awaits) runs to completion before the next starts. Wrap the manager with
/// [`spawn_manager`](crate::spawn_manager) to share it between tasks.
///
/// All hooks that can fail are awaited before the run is modified. An
/// operation that returns `Err` leaves every run exactly as it was.
pub struct DungeonManager<G: DungeonHooks> {
    config: ManagerConfig,
    hooks: G,
    registry: DungeonRegistry,

    runs: HashMap<RunId, DungeonRun<G>>,

    /// Maps each member to the ongoing run they are in.
    /// A member is in at most ONE ongoing run at a time.
    member_runs: HashMap<MemberId, RunId>,

    listeners: Vec<EventSender<G>>,
    next_run_id: u64,
}

impl<G: DungeonHooks> DungeonManager<G> {
    pub fn new(config: ManagerConfig, hooks: G) -> Self {
        Self {
            config,
            hooks,
            registry: DungeonRegistry::new(),
            runs: HashMap::new(),
            member_runs: HashMap::new(),
            listeners: Vec::new(),
            next_run_id: 1,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn game_id(&self) -> &GameId {
        &self.config.game_id
    }

    pub fn hooks(&self) -> &G {
        &self.hooks
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Registers a dungeon template, replacing any with the same id.
    ///
    /// Runs already in progress keep the template they started with.
    pub fn register_dungeon_type(&mut self, dungeon: DungeonType) -> Result<(), DungeonError> {
        self.registry.register(dungeon)?;
        Ok(())
    }

    /// Registers every template in a JSON catalog. Returns how many were
    /// registered.
    ///
    /// The whole catalog is validated before anything is registered.
    pub fn register_catalog(&mut self, json: &str) -> Result<usize, DungeonError> {
        let dungeons = delve_types::parse_catalog(json)?;
        let count = dungeons.len();
        for dungeon in dungeons {
            self.registry.register(dungeon)?;
        }
        Ok(count)
    }

    pub fn dungeon_type(&self, id: &DungeonId) -> Option<Arc<DungeonType>> {
        self.registry.get(id)
    }

    /// All registered templates, sorted by id.
    pub fn dungeon_types(&self) -> Vec<Arc<DungeonType>> {
        self.registry.all()
    }

    /// Looks up a room in a registered template.
    pub fn room_definition(&self, dungeon_id: &DungeonId, room_id: &RoomId) -> Option<&RoomDefinition> {
        self.registry.get_ref(dungeon_id)?.layout.room(room_id)
    }

    /// Dungeons the querying player may enter, as decided by
    /// [`DungeonHooks::available_dungeons`].
    pub async fn available_dungeons(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<Arc<DungeonType>>, DungeonError> {
        self.hooks
            .available_dungeons(query, self.registry.all())
            .await
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Returns a receiver for every event emitted from now on.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> EventReceiver<G> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    fn emit(&mut self, run_id: RunId, event: DungeonEvent<G>) {
        let envelope = EventEnvelope {
            game_id: self.config.game_id.clone(),
            run_id,
            event,
        };
        self.listeners
            .retain(|listener| listener.send(envelope.clone()).is_ok());
    }

    // -----------------------------------------------------------------------
    // Admission
    // -----------------------------------------------------------------------

    /// Starts a run of `dungeon_id` for `party`.
    ///
    /// Checks, in order: the dungeon is registered, the party size is within
    /// bounds, nobody is listed twice, nobody is already in an ongoing run,
    /// and the game's `validate_party` hook accepts the party.
    ///
    /// On success the entry room is available, every other room is locked,
    /// and each member is indexed to the new run.
    pub async fn start_run(
        &mut self,
        dungeon_id: &DungeonId,
        party: DungeonParty,
        difficulty: Difficulty,
    ) -> Result<RunId, DungeonError> {
        let dungeon = self
            .registry
            .get(dungeon_id)
            .ok_or_else(|| DungeonError::UnknownDungeon(dungeon_id.clone()))?;

        if !dungeon.accepts_party_size(party.size()) {
            return Err(DungeonError::PartySize {
                dungeon: dungeon_id.clone(),
                size: party.size(),
                min: dungeon.min_party_size,
                max: dungeon.max_party_size,
            });
        }
        if let Some(member) = party.duplicate_member() {
            return Err(DungeonError::DuplicateMember(member.clone()));
        }
        if let Some((member, run_id)) = party
            .members
            .iter()
            .find_map(|m| self.member_runs.get(m).map(|run_id| (m, *run_id)))
        {
            return Err(DungeonError::AlreadyInRun(member.clone(), run_id));
        }
        self.hooks
            .validate_party(&dungeon, &party)
            .await
            .map_err(DungeonError::PartyRejected)?;

        let run_id = RunId(self.next_run_id);
        self.next_run_id += 1;

        let run = DungeonRun::new(run_id, self.config.game_id.clone(), dungeon, party, difficulty);
        for member in &run.party.members {
            self.member_runs.insert(member.clone(), run_id);
        }
        tracing::info!(
            %run_id,
            %dungeon_id,
            members = run.party.size(),
            %difficulty,
            "run started"
        );
        let event = DungeonEvent::RunStarted {
            dungeon_id: dungeon_id.clone(),
            members: run.party.members.clone(),
            difficulty,
        };
        self.runs.insert(run_id, run);
        self.emit(run_id, event);

        let run = self.run(run_id)?;
        self.hooks.on_dungeon_start(run).await;
        Ok(run_id)
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// Moves the party into a room.
    ///
    /// Requires an `active` run and an unlocked room. Behavior depends on the
    /// room:
    ///
    /// - completed rooms are just revisited (no content, no status change)
    /// - combat rooms generate their encounter once and put the run
    ///   `in_combat`
    /// - event rooms generate their event once and put the run `in_event`
    /// - rest rooms heal living members, then complete
    /// - treasure rooms roll loot once, then complete
    /// - entry rooms complete immediately
    ///
    /// Returns the room's state after entry (after completion for rooms that
    /// complete on entry).
    pub async fn enter_room(
        &mut self,
        run_id: RunId,
        room_id: &RoomId,
    ) -> Result<RoomState<G>, DungeonError> {
        let run = self.run(run_id)?;
        if run.status != RunStatus::Active {
            return Err(invalid_state(run, "entering a room requires an active run"));
        }
        let dungeon = Arc::clone(&run.dungeon);
        let room = dungeon
            .layout
            .room(room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        let state = run
            .room(room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;

        let status = state.status;
        match status {
            RoomStatus::Locked => return Err(DungeonError::RoomLocked(room_id.clone())),
            RoomStatus::Completed => return self.revisit_room(run_id, room),
            status if !status.can_transition_to(RoomStatus::Entered) => {
                return Err(DungeonError::InvalidRoomState {
                    room: room_id.clone(),
                    status,
                    reason: "room cannot be entered".to_string(),
                });
            }
            _ => {}
        }

        let params = RoomParams {
            run_id,
            dungeon: &dungeon,
            room,
            difficulty: run.difficulty,
            party: &run.party,
        };
        let prepared: Prepared<G> = match room.kind {
            kind if kind.is_combat() && state.encounter.is_none() => {
                Prepared::Encounter(self.hooks.generate_encounter(params).await?)
            }
            RoomType::Event if state.event.is_none() => {
                match self.hooks.generate_event(params).await? {
                    Some(event) => Prepared::Event(event),
                    None => Prepared::Nothing,
                }
            }
            RoomType::Treasure if state.loot.is_none() => {
                let params = LootParams {
                    room: params,
                    encounter: None,
                };
                Prepared::Treasure(self.hooks.generate_loot(params).await?)
            }
            RoomType::Rest => Prepared::Healing(self.hooks.rest_healing(&run.party, room)),
            _ => Prepared::Nothing,
        };

        let run = self.run_mut(run_id)?;
        let now = run.elapsed();
        let mut healing = 0;
        let mut treasure = None;
        let first_entry = {
            let state = run
                .room_mut(room_id)
                .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
            state.status = RoomStatus::Entered;
            state.attempts += 1;
            state.entered_at = Some(now);
            match prepared {
                Prepared::Encounter(encounter) => state.encounter = Some(encounter),
                Prepared::Event(event) => state.event = Some(event),
                Prepared::Treasure(loot) => {
                    state.loot = Some(loot.clone());
                    treasure = Some(loot);
                }
                Prepared::Healing(amount) => healing = amount,
                Prepared::Nothing => {}
            }
            state.attempts == 1
        };

        run.current_room = room.id.clone();
        run.current_floor = room.floor;
        if room.checkpoint {
            run.last_checkpoint = Some(room.id.clone());
        }
        if room.secret && first_entry {
            run.stats.secrets_found += 1;
        }
        match room.kind {
            kind if kind.is_combat() => run.status = RunStatus::InCombat,
            RoomType::Event => run.status = RunStatus::InEvent,
            RoomType::Rest => {
                let restored = run.party.heal_all(healing);
                run.stats.healing_done = run.stats.healing_done.saturating_add(restored);
            }
            _ => {}
        }
        if let Some(loot) = &treasure {
            run.loot.merge(loot);
        }

        let snapshot = run
            .room(room_id)
            .cloned()
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        tracing::debug!(
            %run_id,
            %room_id,
            room_type = ?room.kind,
            attempt = snapshot.attempts,
            "room entered"
        );
        self.emit(
            run_id,
            DungeonEvent::RoomEntered {
                room: snapshot.clone(),
                room_type: room.kind,
            },
        );

        if room.kind.auto_completes() {
            let completion = self.finish_room(run_id, room_id, Loot::default()).await?;
            return Ok(completion.room);
        }
        Ok(snapshot)
    }

    /// Moves the party back into an already completed room.
    fn revisit_room(&mut self, run_id: RunId, room: &RoomDefinition) -> Result<RoomState<G>, DungeonError> {
        let run = self.run_mut(run_id)?;
        run.current_room = room.id.clone();
        run.current_floor = room.floor;
        let snapshot = run
            .room(&room.id)
            .cloned()
            .ok_or_else(|| DungeonError::RoomNotFound(room.id.clone()))?;

        tracing::debug!(%run_id, room_id = %room.id, "completed room revisited");
        self.emit(
            run_id,
            DungeonEvent::RoomEntered {
                room: snapshot.clone(),
                room_type: room.kind,
            },
        );
        Ok(snapshot)
    }

    /// Marks an entered room completed and merges `loot` into the run.
    ///
    /// Unlocks every locked room the completed room connects to. Completing
    /// the boss room ends the run in victory.
    pub async fn complete_room(
        &mut self,
        run_id: RunId,
        room_id: &RoomId,
        loot: Option<Loot>,
    ) -> Result<RoomCompletion<G>, DungeonError> {
        self.finish_room(run_id, room_id, loot.unwrap_or_default())
            .await
    }

    async fn finish_room(
        &mut self,
        run_id: RunId,
        room_id: &RoomId,
        loot: Loot,
    ) -> Result<RoomCompletion<G>, DungeonError> {
        let run = self.run_mut(run_id)?;
        if run.status.is_ended() {
            return Err(invalid_state(run, "run has already ended"));
        }
        let dungeon = Arc::clone(&run.dungeon);
        let room = dungeon
            .layout
            .room(room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;

        let now = run.elapsed();
        let state = run
            .room_mut(room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        if !state.status.can_transition_to(RoomStatus::Completed) {
            return Err(DungeonError::InvalidRoomState {
                room: room_id.clone(),
                status: state.status,
                reason: "only an entered room can be completed".to_string(),
            });
        }
        state.status = RoomStatus::Completed;
        state.completed_at = Some(now);

        run.stats.rooms_cleared += 1;
        run.loot.merge(&loot);

        let mut unlocked = Vec::new();
        for next in &room.connections {
            if let Some(state) = run.room_mut(next) {
                if state.status == RoomStatus::Locked {
                    state.status = RoomStatus::Available;
                    unlocked.push(next.clone());
                }
            }
        }
        if matches!(run.status, RunStatus::InCombat | RunStatus::InEvent) {
            run.status = RunStatus::Active;
        }

        let snapshot = run
            .room(room_id)
            .cloned()
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        tracing::info!(
            %run_id,
            %room_id,
            unlocked = unlocked.len(),
            rooms_cleared = run.stats.rooms_cleared,
            "room completed"
        );

        let run = self.run(run_id)?;
        self.hooks.on_room_complete(run, room).await;
        self.emit(
            run_id,
            DungeonEvent::RoomCompleted {
                room_id: room_id.clone(),
                unlocked: unlocked.clone(),
                loot: loot.clone(),
            },
        );

        let result = if *room_id == dungeon.layout.boss_room {
            Some(self.end_run(run_id, RunOutcome::Victory).await?)
        } else {
            None
        };

        Ok(RoomCompletion {
            room: snapshot,
            loot,
            unlocked,
            result,
        })
    }

    /// Available and completed rooms of a run, in layout order.
    pub fn available_rooms(&self, run_id: RunId) -> Result<Vec<&RoomState<G>>, DungeonError> {
        let run = self.run(run_id)?;
        Ok(run.rooms().iter().filter(|r| r.status.is_reachable()).collect())
    }

    // -----------------------------------------------------------------------
    // Combat
    // -----------------------------------------------------------------------

    /// Resolves the current fight as won.
    ///
    /// Rolls loot (with the room's encounter as context), folds `combat`
    /// into the run stats and completes the room.
    pub async fn combat_victory(
        &mut self,
        run_id: RunId,
        combat: CombatResult,
    ) -> Result<RoomCompletion<G>, DungeonError> {
        let run = self.run(run_id)?;
        if run.status != RunStatus::InCombat {
            return Err(invalid_state(run, "no fight in progress"));
        }
        let dungeon = Arc::clone(&run.dungeon);
        let room_id = run.current_room.clone();
        let room = dungeon
            .layout
            .room(&room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        let state = run
            .room(&room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        if state.status != RoomStatus::Entered {
            return Err(DungeonError::InvalidRoomState {
                room: room_id.clone(),
                status: state.status,
                reason: "fight room must be entered".to_string(),
            });
        }

        let params = LootParams {
            room: RoomParams {
                run_id,
                dungeon: &dungeon,
                room,
                difficulty: run.difficulty,
                party: &run.party,
            },
            encounter: state.encounter.as_ref(),
        };
        let loot = self.hooks.generate_loot(params).await?;

        self.run_mut(run_id)?.stats.record_combat(&combat);
        tracing::info!(
            %run_id,
            %room_id,
            enemies = combat.enemies_defeated,
            gold = loot.gold,
            "encounter won"
        );
        self.emit(
            run_id,
            DungeonEvent::EncounterWon {
                room_id: room_id.clone(),
                loot: loot.clone(),
                combat,
            },
        );
        self.finish_room(run_id, &room_id, loot).await
    }

    /// Resolves the current fight as a party wipe.
    ///
    /// The game's `resolve_wipe` hook decides whether the run continues. If
    /// it does, the party moves to the respawn room with status `active`;
    /// otherwise the run ends in defeat. Either way the room is marked
    /// failed and the death is counted.
    pub async fn combat_defeat(&mut self, run_id: RunId) -> Result<WipeOutcome, DungeonError> {
        let run = self.run(run_id)?;
        if run.status != RunStatus::InCombat {
            return Err(invalid_state(run, "no fight in progress"));
        }
        let dungeon = Arc::clone(&run.dungeon);
        let room_id = run.current_room.clone();

        let ctx = WipeContext {
            run_id,
            dungeon: &dungeon,
            party: &run.party,
            failed_room: &room_id,
            last_checkpoint: run.last_checkpoint.as_ref(),
            death_count: run.stats.death_count + 1,
            revives_used: run.revives_used,
        };
        let decision = self.hooks.resolve_wipe(ctx).await?;

        let respawn_floor = match decision.respawn() {
            Some(respawn) => Some(
                dungeon
                    .layout
                    .room(respawn)
                    .ok_or_else(|| DungeonError::RoomNotFound(respawn.clone()))?
                    .floor,
            ),
            None => None,
        };

        let run = self.run_mut(run_id)?;
        wipe::apply(run, &room_id, &decision, respawn_floor);
        tracing::warn!(
            %run_id,
            %room_id,
            deaths = run.stats.death_count,
            can_continue = decision.can_continue,
            "party wiped"
        );
        self.emit(
            run_id,
            DungeonEvent::PartyWiped {
                room_id,
                decision: decision.clone(),
            },
        );

        let result = if decision.can_continue {
            None
        } else {
            Some(self.end_run(run_id, RunOutcome::Defeat).await?)
        };
        Ok(WipeOutcome { decision, result })
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Resolves the party's choice in the current event room, merges any
    /// rewards and completes the room.
    pub async fn select_event_choice(
        &mut self,
        run_id: RunId,
        choice: usize,
    ) -> Result<EventOutcome, DungeonError> {
        let run = self.run(run_id)?;
        if run.status != RunStatus::InEvent {
            return Err(invalid_state(run, "no event in progress"));
        }
        let dungeon = Arc::clone(&run.dungeon);
        let room_id = run.current_room.clone();
        let room = dungeon
            .layout
            .room(&room_id)
            .ok_or_else(|| DungeonError::RoomNotFound(room_id.clone()))?;
        let event = run
            .room(&room_id)
            .and_then(|r| r.event.as_ref())
            .ok_or(DungeonError::NoActiveEvent(run_id))?;

        let params = EventChoiceParams {
            run_id,
            room,
            event,
            choice,
            party: &run.party,
        };
        let outcome = self.hooks.resolve_event_choice(params).await?;

        tracing::debug!(%run_id, %room_id, choice, success = outcome.success, "event resolved");
        self.emit(
            run_id,
            DungeonEvent::EventResolved {
                room_id: room_id.clone(),
                choice,
                outcome: outcome.clone(),
            },
        );
        let rewards = outcome.rewards.clone().unwrap_or_default();
        self.finish_room(run_id, &room_id, rewards).await?;
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Ending
    // -----------------------------------------------------------------------

    /// Ends a run and produces its result.
    ///
    /// Stamps the elapsed time, rates it against the par time (victories
    /// only) and releases every member so they can join another run. The run
    /// itself stays queryable until removed.
    pub async fn end_run(
        &mut self,
        run_id: RunId,
        outcome: RunOutcome,
    ) -> Result<DungeonResult, DungeonError> {
        let run = self.run_mut(run_id)?;
        if run.status.is_ended() {
            return Err(invalid_state(run, "run has already ended"));
        }

        let elapsed = run.elapsed();
        run.stats.elapsed = elapsed;
        run.status = outcome.into();
        let boss_defeated = run
            .room(&run.dungeon.layout.boss_room)
            .is_some_and(|r| r.status == RoomStatus::Completed);
        let result = DungeonResult {
            run_id,
            dungeon_id: run.dungeon.id.clone(),
            outcome,
            completion_time: elapsed,
            medal: medal_for(&run.dungeon, outcome, elapsed),
            loot: run.loot.clone(),
            stats: run.stats.clone(),
            floors_cleared: run.current_floor + 1,
            boss_defeated,
        };
        run.result = Some(result.clone());

        self.member_runs.retain(|_, rid| *rid != run_id);

        tracing::info!(
            %run_id,
            %outcome,
            elapsed_ms = elapsed.as_millis() as u64,
            medal = ?result.medal,
            "run ended"
        );

        let run = self.run(run_id)?;
        self.hooks.on_dungeon_end(run, &result).await;
        self.emit(
            run_id,
            DungeonEvent::RunCompleted {
                result: result.clone(),
            },
        );
        Ok(result)
    }

    /// Ends a run as fled.
    pub async fn abandon_run(&mut self, run_id: RunId) -> Result<DungeonResult, DungeonError> {
        self.end_run(run_id, RunOutcome::Fled).await
    }

    /// Removes an ended run from the manager and returns it.
    pub fn remove_run(&mut self, run_id: RunId) -> Result<DungeonRun<G>, DungeonError> {
        let run = self.run(run_id)?;
        if run.status.is_ongoing() {
            return Err(invalid_state(run, "cannot remove a run that is still going"));
        }
        self.runs
            .remove(&run_id)
            .ok_or(DungeonError::RunNotFound(run_id))
    }

    /// Removes every ended run. Returns the ids removed.
    pub fn prune_finished_runs(&mut self) -> Vec<RunId> {
        let mut removed: Vec<RunId> = self
            .runs
            .values()
            .filter(|r| r.status.is_ended())
            .map(|r| r.id)
            .collect();
        removed.sort();
        for run_id in &removed {
            self.runs.remove(run_id);
        }
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "finished runs pruned");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_run(&self, run_id: RunId) -> Option<&DungeonRun<G>> {
        self.runs.get(&run_id)
    }

    /// The ongoing run `member` is in, if any.
    pub fn member_run(&self, member: &MemberId) -> Option<&DungeonRun<G>> {
        self.member_runs
            .get(member)
            .and_then(|run_id| self.runs.get(run_id))
    }

    pub fn is_in_dungeon(&self, member: &MemberId) -> bool {
        self.member_runs.contains_key(member)
    }

    /// Runs whose status is exactly `active`: not fighting, not in an
    /// event, not ended.
    pub fn active_runs(&self) -> Vec<&DungeonRun<G>> {
        self.runs
            .values()
            .filter(|r| r.status == RunStatus::Active)
            .collect()
    }

    /// Runs that have not ended yet.
    pub fn ongoing_runs(&self) -> Vec<&DungeonRun<G>> {
        self.runs
            .values()
            .filter(|r| r.status.is_ongoing())
            .collect()
    }

    /// Number of runs held, ended ones included.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Mutable access to the game's scratch data on a run.
    pub fn run_data_mut(&mut self, run_id: RunId) -> Option<&mut G::RunData> {
        self.runs.get_mut(&run_id).map(|r| &mut r.data)
    }

    fn run(&self, run_id: RunId) -> Result<&DungeonRun<G>, DungeonError> {
        self.runs
            .get(&run_id)
            .ok_or(DungeonError::RunNotFound(run_id))
    }

    fn run_mut(&mut self, run_id: RunId) -> Result<&mut DungeonRun<G>, DungeonError> {
        self.runs
            .get_mut(&run_id)
            .ok_or(DungeonError::RunNotFound(run_id))
    }
}

fn invalid_state<G: DungeonHooks>(run: &DungeonRun<G>, reason: &str) -> DungeonError {
    DungeonError::InvalidState {
        run: run.id,
        status: run.status,
        reason: reason.to_string(),
    }
}
