//! Completion medals.

use std::fmt;
use std::time::Duration;

use delve_types::DungeonType;
use serde::{Deserialize, Serialize};

use crate::RunOutcome;

/// Time-based rating for a victorious run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Rates `elapsed` against `par`.
    ///
    /// | elapsed / par | medal  |
    /// |---------------|--------|
    /// | ≤ 0.75        | gold   |
    /// | ≤ 1.0         | silver |
    /// | ≤ 1.5         | bronze |
    /// | above         | none   |
    ///
    /// A zero par time never awards a medal.
    pub fn for_time(elapsed: Duration, par: Duration) -> Option<Self> {
        if par.is_zero() {
            return None;
        }
        let elapsed = elapsed.as_nanos();
        let par = par.as_nanos();

        // Integer comparisons so the boundaries are exact.
        if elapsed * 4 <= par * 3 {
            Some(Self::Gold)
        } else if elapsed <= par {
            Some(Self::Silver)
        } else if elapsed * 2 <= par * 3 {
            Some(Self::Bronze)
        } else {
            None
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => write!(f, "gold"),
            Self::Silver => write!(f, "silver"),
            Self::Bronze => write!(f, "bronze"),
        }
    }
}

/// Medal for a finished run: victories in dungeons with a par time only.
pub(crate) fn medal_for(dungeon: &DungeonType, outcome: RunOutcome, elapsed: Duration) -> Option<Medal> {
    if outcome != RunOutcome::Victory {
        return None;
    }
    dungeon.par_time().and_then(|par| Medal::for_time(elapsed, par))
}
