//! Completed-but-unsubmitted results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::matchups::Team;
use crate::domain::selection::{SelectedMatchup, SlotId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Single-digit game score for one side of a set (0..=9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// Parses one keystroke. Anything but an ASCII digit is rejected.
    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new(value).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidScore,
                format!("score {value} is not a single digit"),
            )
        })
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Team1,
    Team2,
}

/// One completed set waiting to be sent to the rating backend.
///
/// Keyed by the slot that produced it, so re-completing a slot replaces
/// the earlier result instead of adding a second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedResult {
    pub id: SlotId,
    /// Fresh for every completion. Slot ids repeat across sessions, this
    /// does not.
    pub submission_key: Uuid,
    pub order: u32,
    pub team1: Team,
    pub team2: Team,
    pub team1_score: Score,
    pub team2_score: Score,
}

impl QueuedResult {
    pub fn from_slot(slot: &SelectedMatchup, team1_score: Score, team2_score: Score) -> Self {
        Self {
            id: slot.id,
            submission_key: Uuid::new_v4(),
            order: slot.order,
            team1: slot.team1.clone(),
            team2: slot.team2.clone(),
            team1_score,
            team2_score,
        }
    }

    /// `None` for a drawn set; ties are not rejected at this layer.
    pub fn winner(&self) -> Option<TeamSide> {
        match self.team1_score.cmp(&self.team2_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Team1),
            std::cmp::Ordering::Less => Some(TeamSide::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Sets won per side. Each result is exactly one set.
    pub fn set_wins(&self) -> (u8, u8) {
        match self.winner() {
            Some(TeamSide::Team1) => (1, 0),
            Some(TeamSide::Team2) => (0, 1),
            None => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultsCart {
    // order -> result; order is unique per slot
    items: BTreeMap<u32, QueuedResult>,
}

impl ResultsCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for its slot. Returns `true` on replace.
    pub fn upsert(&mut self, result: QueuedResult) -> bool {
        let replaced = self.items.insert(result.order, result).is_some();
        if replaced {
            debug!("queued result replaced");
        }
        replaced
    }

    pub fn remove(&mut self, id: &SlotId) -> Option<QueuedResult> {
        let order = self.items.values().find(|r| &r.id == id)?.order;
        self.items.remove(&order)
    }

    pub fn get(&self, id: &SlotId) -> Option<&QueuedResult> {
        self.items.values().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Results in ascending `order`.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedResult> {
        self.items.values()
    }

    pub fn snapshot(&self) -> Vec<QueuedResult> {
        self.items.values().cloned().collect()
    }
}
