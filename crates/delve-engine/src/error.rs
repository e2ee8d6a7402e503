//! Error types for the engine.

use delve_types::{DefinitionError, DungeonId, MemberId, RoomId, RunId};

use crate::{RoomStatus, RunStatus};

/// Errors that can occur during dungeon operations.
///
/// Preconditions are checked and fallible hooks awaited before an
/// operation mutates anything, so a precondition or hook failure leaves the
/// run unchanged. An error from a later step of a multi-step operation (for
/// example ending the run after the boss room) may follow earlier changes.
#[derive(Debug, thiserror::Error)]
pub enum DungeonError {
    // -- Validation --

    /// No dungeon type with this id is registered.
    #[error("unknown dungeon {0}")]
    UnknownDungeon(DungeonId),

    /// The party is smaller or larger than the dungeon allows.
    #[error("dungeon {dungeon} needs {min}-{max} members, got {size}")]
    PartySize {
        dungeon: DungeonId,
        size: usize,
        min: usize,
        max: usize,
    },

    /// The same member is listed twice in one party.
    #[error("member {0} is listed more than once")]
    DuplicateMember(MemberId),

    /// The member is already part of another ongoing run.
    #[error("member {0} is already in run {1}")]
    AlreadyInRun(MemberId, RunId),

    /// The game's party validation hook refused the party.
    #[error("party rejected: {0}")]
    PartyRejected(String),

    /// A dungeon template failed validation at registration.
    #[error(transparent)]
    InvalidDungeon(#[from] DefinitionError),

    // -- State --

    /// The run is not in a status that allows this operation.
    #[error("run {run} is {status}: {reason}")]
    InvalidState {
        run: RunId,
        status: RunStatus,
        reason: String,
    },

    /// The room has not been unlocked yet.
    #[error("room {0} is locked")]
    RoomLocked(RoomId),

    /// The room is not in a status that allows this operation.
    #[error("room {room} is {status}: {reason}")]
    InvalidRoomState {
        room: RoomId,
        status: RoomStatus,
        reason: String,
    },

    /// `select_event_choice` was called with no event on the current room.
    #[error("run {0} has no active event")]
    NoActiveEvent(RunId),

    // -- Not found --

    #[error("run {0} not found")]
    RunNotFound(RunId),

    #[error("room {0} not found in dungeon layout")]
    RoomNotFound(RoomId),

    // -- Collaborators --

    /// A game hook reported a failure.
    #[error("hook failed: {0}")]
    Hook(String),

    /// The manager actor has shut down.
    #[error("dungeon manager is unavailable")]
    Unavailable,
}
