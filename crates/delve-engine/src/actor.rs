//! Manager actor: a Tokio task that owns a [`DungeonManager`].
//!
//! Every operation is a command on a bounded channel, so operations from
//! many tasks are applied one at a time and a membership check can never
//! race with the registration that follows it.

use std::sync::Arc;

use delve_types::{Difficulty, DungeonId, DungeonParty, DungeonType, GameId, Loot, MemberId, RoomId, RunId};
use tokio::sync::{mpsc, oneshot};

use crate::events::EventReceiver;
use crate::{
    AvailabilityQuery, CombatResult, DungeonError, DungeonHooks, DungeonManager,
    DungeonResult, DungeonRun, EventOutcome, RoomCompletion, RoomState,
    RunOutcome, WipeOutcome,
};

type Reply<T> = oneshot::Sender<Result<T, DungeonError>>;

/// Commands sent to the manager actor.
pub(crate) enum ManagerCommand<G: DungeonHooks> {
    RegisterDungeon {
        dungeon: DungeonType,
        reply: Reply<()>,
    },
    AvailableDungeons {
        query: AvailabilityQuery,
        reply: Reply<Vec<Arc<DungeonType>>>,
    },
    StartRun {
        dungeon_id: DungeonId,
        party: DungeonParty,
        difficulty: Difficulty,
        reply: Reply<RunId>,
    },
    EnterRoom {
        run_id: RunId,
        room_id: RoomId,
        reply: Reply<RoomState<G>>,
    },
    CompleteRoom {
        run_id: RunId,
        room_id: RoomId,
        loot: Option<Loot>,
        reply: Reply<RoomCompletion<G>>,
    },
    CombatVictory {
        run_id: RunId,
        combat: CombatResult,
        reply: Reply<RoomCompletion<G>>,
    },
    CombatDefeat {
        run_id: RunId,
        reply: Reply<WipeOutcome>,
    },
    SelectEventChoice {
        run_id: RunId,
        choice: usize,
        reply: Reply<EventOutcome>,
    },
    EndRun {
        run_id: RunId,
        outcome: RunOutcome,
        reply: Reply<DungeonResult>,
    },
    GetRun {
        run_id: RunId,
        reply: oneshot::Sender<Option<DungeonRun<G>>>,
    },
    MemberRun {
        member: MemberId,
        reply: oneshot::Sender<Option<RunId>>,
    },
    AvailableRooms {
        run_id: RunId,
        reply: Reply<Vec<RoomState<G>>>,
    },
    Subscribe {
        reply: oneshot::Sender<EventReceiver<G>>,
    },
    Shutdown,
}

/// Handle to a running manager actor.
///
/// Cheap to clone: it wraps an `mpsc::Sender`. Every method fails with
/// [`DungeonError::Unavailable`] once the actor has stopped.
pub struct ManagerHandle<G: DungeonHooks> {
    game_id: GameId,
    sender: mpsc::Sender<ManagerCommand<G>>,
}

impl<G: DungeonHooks> Clone for ManagerHandle<G> {
    fn clone(&self) -> Self {
        Self {
            game_id: self.game_id.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<G: DungeonHooks> ManagerHandle<G> {
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Sends a command and waits for its reply.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> ManagerCommand<G>,
    ) -> Result<T, DungeonError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| DungeonError::Unavailable)?;
        reply_rx.await.map_err(|_| DungeonError::Unavailable)
    }

    pub async fn register_dungeon_type(&self, dungeon: DungeonType) -> Result<(), DungeonError> {
        self.request(|reply| ManagerCommand::RegisterDungeon { dungeon, reply })
            .await?
    }

    pub async fn available_dungeons(
        &self,
        query: AvailabilityQuery,
    ) -> Result<Vec<Arc<DungeonType>>, DungeonError> {
        self.request(|reply| ManagerCommand::AvailableDungeons { query, reply })
            .await?
    }

    pub async fn start_run(
        &self,
        dungeon_id: impl Into<DungeonId>,
        party: DungeonParty,
        difficulty: Difficulty,
    ) -> Result<RunId, DungeonError> {
        let dungeon_id = dungeon_id.into();
        self.request(|reply| ManagerCommand::StartRun {
            dungeon_id,
            party,
            difficulty,
            reply,
        })
        .await?
    }

    pub async fn enter_room(
        &self,
        run_id: RunId,
        room_id: impl Into<RoomId>,
    ) -> Result<RoomState<G>, DungeonError> {
        let room_id = room_id.into();
        self.request(|reply| ManagerCommand::EnterRoom {
            run_id,
            room_id,
            reply,
        })
        .await?
    }

    pub async fn complete_room(
        &self,
        run_id: RunId,
        room_id: impl Into<RoomId>,
        loot: Option<Loot>,
    ) -> Result<RoomCompletion<G>, DungeonError> {
        let room_id = room_id.into();
        self.request(|reply| ManagerCommand::CompleteRoom {
            run_id,
            room_id,
            loot,
            reply,
        })
        .await?
    }

    pub async fn combat_victory(
        &self,
        run_id: RunId,
        combat: CombatResult,
    ) -> Result<RoomCompletion<G>, DungeonError> {
        self.request(|reply| ManagerCommand::CombatVictory {
            run_id,
            combat,
            reply,
        })
        .await?
    }

    pub async fn combat_defeat(&self, run_id: RunId) -> Result<WipeOutcome, DungeonError> {
        self.request(|reply| ManagerCommand::CombatDefeat { run_id, reply })
            .await?
    }

    pub async fn select_event_choice(
        &self,
        run_id: RunId,
        choice: usize,
    ) -> Result<EventOutcome, DungeonError> {
        self.request(|reply| ManagerCommand::SelectEventChoice {
            run_id,
            choice,
            reply,
        })
        .await?
    }

    pub async fn end_run(
        &self,
        run_id: RunId,
        outcome: RunOutcome,
    ) -> Result<DungeonResult, DungeonError> {
        self.request(|reply| ManagerCommand::EndRun {
            run_id,
            outcome,
            reply,
        })
        .await?
    }

    pub async fn abandon_run(&self, run_id: RunId) -> Result<DungeonResult, DungeonError> {
        self.end_run(run_id, RunOutcome::Fled).await
    }

    /// A snapshot of the run.
    pub async fn get_run(&self, run_id: RunId) -> Result<Option<DungeonRun<G>>, DungeonError> {
        self.request(|reply| ManagerCommand::GetRun { run_id, reply })
            .await
    }

    /// The ongoing run `member` is in, if any.
    pub async fn member_run(&self, member: impl Into<MemberId>) -> Result<Option<RunId>, DungeonError> {
        let member = member.into();
        self.request(|reply| ManagerCommand::MemberRun { member, reply })
            .await
    }

    pub async fn available_rooms(&self, run_id: RunId) -> Result<Vec<RoomState<G>>, DungeonError> {
        self.request(|reply| ManagerCommand::AvailableRooms { run_id, reply })
            .await?
    }

    pub async fn subscribe(&self) -> Result<EventReceiver<G>, DungeonError> {
        self.request(|reply| ManagerCommand::Subscribe { reply })
            .await
    }

    /// Tells the actor to stop. Pending commands queued after this one are
    /// dropped.
    pub async fn shutdown(&self) -> Result<(), DungeonError> {
        self.sender
            .send(ManagerCommand::Shutdown)
            .await
            .map_err(|_| DungeonError::Unavailable)
    }
}

/// Runs the actor loop, applying commands until shutdown or until every
/// handle is dropped.
async fn run_actor<G: DungeonHooks>(
    mut manager: DungeonManager<G>,
    mut receiver: mpsc::Receiver<ManagerCommand<G>>,
) {
    let game_id = manager.game_id().clone();
    tracing::info!(%game_id, "dungeon manager started");

    while let Some(cmd) = receiver.recv().await {
        match cmd {
            ManagerCommand::RegisterDungeon { dungeon, reply } => {
                let _ = reply.send(manager.register_dungeon_type(dungeon));
            }
            ManagerCommand::AvailableDungeons { query, reply } => {
                let _ = reply.send(manager.available_dungeons(&query).await);
            }
            ManagerCommand::StartRun {
                dungeon_id,
                party,
                difficulty,
                reply,
            } => {
                let result = manager.start_run(&dungeon_id, party, difficulty).await;
                let _ = reply.send(result);
            }
            ManagerCommand::EnterRoom {
                run_id,
                room_id,
                reply,
            } => {
                let _ = reply.send(manager.enter_room(run_id, &room_id).await);
            }
            ManagerCommand::CompleteRoom {
                run_id,
                room_id,
                loot,
                reply,
            } => {
                let _ = reply.send(manager.complete_room(run_id, &room_id, loot).await);
            }
            ManagerCommand::CombatVictory {
                run_id,
                combat,
                reply,
            } => {
                let _ = reply.send(manager.combat_victory(run_id, combat).await);
            }
            ManagerCommand::CombatDefeat { run_id, reply } => {
                let _ = reply.send(manager.combat_defeat(run_id).await);
            }
            ManagerCommand::SelectEventChoice {
                run_id,
                choice,
                reply,
            } => {
                let _ = reply.send(manager.select_event_choice(run_id, choice).await);
            }
            ManagerCommand::EndRun {
                run_id,
                outcome,
                reply,
            } => {
                let _ = reply.send(manager.end_run(run_id, outcome).await);
            }
            ManagerCommand::GetRun { run_id, reply } => {
                let _ = reply.send(manager.get_run(run_id).cloned());
            }
            ManagerCommand::MemberRun { member, reply } => {
                let _ = reply.send(manager.member_run(&member).map(|run| run.id));
            }
            ManagerCommand::AvailableRooms { run_id, reply } => {
                let rooms = manager
                    .available_rooms(run_id)
                    .map(|rooms| rooms.into_iter().cloned().collect());
                let _ = reply.send(rooms);
            }
            ManagerCommand::Subscribe { reply } => {
                let _ = reply.send(manager.subscribe());
            }
            ManagerCommand::Shutdown => {
                tracing::info!(%game_id, "dungeon manager shutting down");
                break;
            }
        }
    }

    tracing::info!(%game_id, "dungeon manager stopped");
}

/// Spawns a manager actor task and returns a handle to it.
///
/// The command channel is bounded by `command_channel_size` from the
/// manager's config; senders wait when it is full.
pub fn spawn_manager<G: DungeonHooks>(manager: DungeonManager<G>) -> ManagerHandle<G> {
    let game_id = manager.game_id().clone();
    let (sender, receiver) = mpsc::channel(manager.config().command_channel_size.max(1));
    tokio::spawn(run_actor(manager, receiver));
    ManagerHandle { game_id, sender }
}
