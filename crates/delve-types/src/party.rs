//! The party that enters a dungeon together.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::MemberId;

/// Live state of one party member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberState {
    pub hp: u32,
    pub max_hp: u32,
    pub alive: bool,
}

impl MemberState {
    /// A living member at full health.
    pub fn healthy(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            alive: true,
        }
    }
}

/// A group of members running a dungeon.
///
/// `member_states` is optional per member: games that track health outside
/// the engine can leave it empty, in which case rest rooms heal nobody.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DungeonParty {
    pub members: Vec<MemberId>,

    #[serde(default)]
    pub member_states: HashMap<MemberId, MemberState>,

    #[serde(default)]
    pub average_level: u32,

    /// Buff identifiers active for the whole party.
    #[serde(default)]
    pub bonuses: Vec<String>,
}

impl DungeonParty {
    /// Creates a party with no tracked member state.
    pub fn new<I, M>(members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Attaches live state for a member.
    pub fn with_state(mut self, member: impl Into<MemberId>, state: MemberState) -> Self {
        self.member_states.insert(member.into(), state);
        self
    }

    pub fn with_average_level(mut self, level: u32) -> Self {
        self.average_level = level;
        self
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Returns the first member listed twice, if any.
    pub fn duplicate_member(&self) -> Option<&MemberId> {
        self.members
            .iter()
            .enumerate()
            .find(|&(i, m)| self.members[..i].contains(m))
            .map(|(_, m)| m)
    }

    /// Mean `max_hp` over members with tracked state. 0 when none are tracked.
    pub fn average_max_hp(&self) -> u32 {
        if self.member_states.is_empty() {
            return 0;
        }
        let total: u64 = self
            .member_states
            .values()
            .map(|s| u64::from(s.max_hp))
            .sum();
        (total / self.member_states.len() as u64) as u32
    }

    /// Heals every living member by `amount`, capped at their max HP.
    ///
    /// Returns the total HP actually restored.
    pub fn heal_all(&mut self, amount: u32) -> u64 {
        let mut restored = 0u64;
        for state in self.member_states.values_mut().filter(|s| s.alive) {
            let before = state.hp;
            state.hp = state.hp.saturating_add(amount).min(state.max_hp);
            restored += u64::from(state.hp - before);
        }
        restored
    }
}
