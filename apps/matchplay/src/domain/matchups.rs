//! The three ways to split four players into two doubles teams.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::roster::{PlayerId, Roster};

pub const COMBINATIONS_PER_ROSTER: usize = 3;

/// A doubles pair. Order inside the pair carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub first: PlayerId,
    pub second: PlayerId,
}

impl Team {
    pub fn new(first: PlayerId, second: PlayerId) -> Self {
        Self { first, second }
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        &self.first == player || &self.second == player
    }

    /// True when both teams hold the same two players, in any order.
    pub fn same_pair(&self, other: &Team) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}

/// 1-based combination number, stable for a given roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(u8);

impl CombinationId {
    pub const FIRST: CombinationId = CombinationId(1);
    pub const SECOND: CombinationId = CombinationId(2);
    pub const THIRD: CombinationId = CombinationId(3);

    /// Returns `None` outside 1..=3.
    pub fn new(value: u8) -> Option<Self> {
        (1..=COMBINATIONS_PER_ROSTER as u8)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupCombination {
    pub id: CombinationId,
    pub team1: Team,
    pub team2: Team,
}

impl MatchupCombination {
    /// Both players are on the same side.
    pub fn teammates(&self, a: &PlayerId, b: &PlayerId) -> bool {
        (self.team1.contains(a) && self.team1.contains(b))
            || (self.team2.contains(a) && self.team2.contains(b))
    }

    /// The players face each other.
    pub fn opponents(&self, a: &PlayerId, b: &PlayerId) -> bool {
        (self.team1.contains(a) && self.team2.contains(b))
            || (self.team2.contains(a) && self.team1.contains(b))
    }
}

/// Enumerate every 2v2 split of the roster.
///
/// p1 is paired with each of p2, p3, p4 in turn, and the remaining two form
/// the opposing side:
///
/// 1. {p1,p2} vs {p3,p4}
/// 2. {p1,p3} vs {p2,p4}
/// 3. {p1,p4} vs {p2,p3}
pub fn generate_combinations(roster: &Roster) -> [MatchupCombination; COMBINATIONS_PER_ROSTER] {
    let [p1, p2, p3, p4] = roster.ids();
    let split = |id: CombinationId, partner: &PlayerId, rest: (&PlayerId, &PlayerId)| {
        MatchupCombination {
            id,
            team1: Team::new(p1.clone(), partner.clone()),
            team2: Team::new(rest.0.clone(), rest.1.clone()),
        }
    };

    [
        split(CombinationId::FIRST, p2, (p3, p4)),
        split(CombinationId::SECOND, p3, (p2, p4)),
        split(CombinationId::THIRD, p4, (p2, p3)),
    ]
}
