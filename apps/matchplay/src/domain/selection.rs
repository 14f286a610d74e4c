//! Ordered, repeatable session queue of selected matchups.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::matchups::{CombinationId, MatchupCombination, Team, COMBINATIONS_PER_ROSTER};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Identity of one queued instance of a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId {
    pub combination: CombinationId,
    pub instance: u32,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}#{}", self.combination, self.instance)
    }
}

/// Lifecycle of a queue slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Waiting for (or in the middle of) score entry.
    #[default]
    Pending,
    /// Both scores entered; a queued result sits in the cart.
    Complete,
    /// Persisted by the rating backend. Immutable from here on.
    Submitted,
    /// The last submission attempt stopped on this slot.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedMatchup {
    pub id: SlotId,
    pub combination: CombinationId,
    pub team1: Team,
    pub team2: Team,
    /// 1-based position in the session; defines submission order.
    pub order: u32,
    pub instance_number: u32,
    pub status: SlotStatus,
}

#[derive(Debug, Clone)]
pub struct SelectionQueue {
    combinations: [MatchupCombination; COMBINATIONS_PER_ROSTER],
    slots: Vec<SelectedMatchup>,
    counts: [u32; COMBINATIONS_PER_ROSTER],
    current: Option<usize>,
}

impl SelectionQueue {
    pub fn new(combinations: [MatchupCombination; COMBINATIONS_PER_ROSTER]) -> Self {
        Self {
            combinations,
            slots: Vec::new(),
            counts: [0; COMBINATIONS_PER_ROSTER],
            current: None,
        }
    }

    pub fn combinations(&self) -> &[MatchupCombination; COMBINATIONS_PER_ROSTER] {
        &self.combinations
    }

    /// Append a new instance of `combination` to the end of the queue.
    ///
    /// Repeats are allowed. When the cursor is idle it moves onto the new slot.
    pub fn select(&mut self, combination: CombinationId) -> Result<&SelectedMatchup, DomainError> {
        let source = self
            .combinations
            .iter()
            .find(|c| c.id == combination)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::UnknownCombination,
                    format!("combination {combination} is not part of this roster"),
                )
            })?;

        let counter = &mut self.counts[combination.index()];
        *counter += 1;
        let instance = *counter;
        let order = self.slots.len() as u32 + 1;

        let slot = SelectedMatchup {
            id: SlotId {
                combination,
                instance,
            },
            combination,
            team1: source.team1.clone(),
            team2: source.team2.clone(),
            order,
            instance_number: instance,
            status: SlotStatus::Pending,
        };
        debug!(slot = %slot.id, order, "matchup selected");
        self.slots.push(slot);

        let index = self.slots.len() - 1;
        if self.current.is_none() {
            self.current = Some(index);
        }
        Ok(&self.slots[index])
    }

    /// How many times `combination` has been queued this session.
    pub fn selection_count(&self, combination: CombinationId) -> u32 {
        self.counts[combination.index()]
    }

    pub fn slots(&self) -> &[SelectedMatchup] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SelectedMatchup> {
        self.slots.get(index)
    }

    pub fn position_of(&self, id: &SlotId) -> Option<usize> {
        self.slots.iter().position(|s| &s.id == id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&SelectedMatchup> {
        self.current.and_then(|i| self.slots.get(i))
    }

    pub(crate) fn point_at(&mut self, index: Option<usize>) {
        debug_assert!(index.is_none_or(|i| i < self.slots.len()));
        self.current = index;
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut SelectedMatchup> {
        self.slots.get_mut(index)
    }

    pub(crate) fn set_status(&mut self, id: &SlotId, status: SlotStatus) -> Result<(), DomainError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Slot, id.to_string()))?;
        slot.status = status;
        Ok(())
    }

    /// Next slot still waiting for scores: forward from `index`, then
    /// wrapping round to the front of the queue.
    pub fn next_incomplete_after(&self, index: usize) -> Option<usize> {
        let len = self.slots.len();
        (1..len)
            .map(|step| (index + step) % len)
            .find(|&i| self.slots[i].status == SlotStatus::Pending)
    }

    pub(crate) fn require_index(&self, index: usize) -> Result<&SelectedMatchup, DomainError> {
        self.slots.get(index).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::SlotOutOfRange,
                format!("slot {index} out of range (queue has {})", self.slots.len()),
            )
        })
    }
}
