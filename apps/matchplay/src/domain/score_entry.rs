//! Two-field score entry with auto-advance and auto-complete.
//!
//! Each queue slot moves through `Empty -> Team1Filled -> Complete`. The
//! second digit completes the slot on the spot: the result goes straight
//! into the cart and the cursor moves to the next slot still waiting for
//! scores. There is no confirm step.
//!
//! The engine never touches a UI toolkit. Focus changes come back as
//! [`EntryEffect::RequestFocus`] values, which a screen forwards to its
//! own [`FocusPort`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::cart::{QueuedResult, ResultsCart, Score};
use crate::domain::selection::{SelectionQueue, SlotId, SlotStatus};
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Team1,
    Team2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
    #[default]
    Empty,
    Team1Filled {
        team1: Score,
    },
    Complete {
        team1: Score,
        team2: Score,
    },
}

impl EntryState {
    /// The field a user should be typing into next.
    pub fn focus_field(&self) -> ScoreField {
        match self {
            EntryState::Empty => ScoreField::Team1,
            EntryState::Team1Filled { .. } | EntryState::Complete { .. } => ScoreField::Team2,
        }
    }
}

/// Side effects produced by a transition, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEffect {
    RequestFocus { slot: SlotId, field: ScoreField },
    ResultQueued(QueuedResult),
    Advanced { from: SlotId, to: SlotId },
    /// Every slot has scores; nothing left to type into.
    Idle,
    /// A completed slot was reopened for editing and its result dropped.
    Reopened { slot: SlotId },
}

/// Platform hook for moving keyboard focus between the two score fields.
pub trait FocusPort {
    fn request_focus(&mut self, slot: SlotId, field: ScoreField);
}

/// Forward every focus request in `effects` to `port`.
pub fn dispatch_focus<P: FocusPort + ?Sized>(effects: &[EntryEffect], port: &mut P) {
    for effect in effects {
        if let EntryEffect::RequestFocus { slot, field } = effect {
            port.request_focus(*slot, *field);
        }
    }
}

/// Mutable view of the queue and cart the engine works against.
pub struct EntryContext<'a> {
    pub queue: &'a mut SelectionQueue,
    pub cart: &'a mut ResultsCart,
}

#[derive(Debug, Default)]
pub struct ScoreEntryEngine {
    states: HashMap<SlotId, EntryState>,
}

impl ScoreEntryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, slot: &SlotId) -> EntryState {
        self.states.get(slot).copied().unwrap_or_default()
    }

    /// A single keystroke into one of the current slot's fields.
    ///
    /// Non-digits are dropped without effects.
    pub fn type_key(
        &mut self,
        ctx: &mut EntryContext<'_>,
        field: ScoreField,
        key: char,
    ) -> Vec<EntryEffect> {
        let Some(digit) = Score::from_char(key) else {
            return Vec::new();
        };
        let Some((index, slot)) = editable_slot(ctx) else {
            return Vec::new();
        };

        match (field, self.state_of(&slot)) {
            (ScoreField::Team1, EntryState::Empty | EntryState::Team1Filled { .. }) => {
                self.states
                    .insert(slot, EntryState::Team1Filled { team1: digit });
                vec![EntryEffect::RequestFocus {
                    slot,
                    field: ScoreField::Team2,
                }]
            }
            (ScoreField::Team2, EntryState::Team1Filled { team1 }) => {
                self.complete(ctx, index, team1, digit)
            }
            (ScoreField::Team2, EntryState::Empty) => vec![EntryEffect::RequestFocus {
                slot,
                field: ScoreField::Team1,
            }],
            (_, EntryState::Complete { .. }) => Vec::new(),
        }
    }

    /// Paste into the current slot. Exactly two digits fill both fields
    /// and complete the slot, the same as typing them one by one.
    pub fn paste(&mut self, ctx: &mut EntryContext<'_>, text: &str) -> Vec<EntryEffect> {
        let mut chars = text.trim().chars();
        let (Some(a), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Vec::new();
        };
        let (Some(team1), Some(team2)) = (Score::from_char(a), Score::from_char(b)) else {
            return Vec::new();
        };
        let Some((index, _)) = editable_slot(ctx) else {
            return Vec::new();
        };
        self.complete(ctx, index, team1, team2)
    }

    pub fn backspace(&mut self, ctx: &mut EntryContext<'_>, field: ScoreField) -> Vec<EntryEffect> {
        let Some((_, slot)) = editable_slot(ctx) else {
            return Vec::new();
        };

        match (field, self.state_of(&slot)) {
            // team2 is always empty while the slot is still pending
            (ScoreField::Team2, _) => vec![EntryEffect::RequestFocus {
                slot,
                field: ScoreField::Team1,
            }],
            (ScoreField::Team1, EntryState::Team1Filled { .. }) => {
                self.states.insert(slot, EntryState::Empty);
                Vec::new()
            }
            (ScoreField::Team1, _) => Vec::new(),
        }
    }

    /// Move the cursor to `index`. A completed slot is cleared and its
    /// queued result dropped; it counts as incomplete until re-entered.
    pub fn jump_to(
        &mut self,
        ctx: &mut EntryContext<'_>,
        index: usize,
    ) -> Result<Vec<EntryEffect>, DomainError> {
        let target = ctx.queue.require_index(index)?;
        let (slot, status) = (target.id, target.status);
        let mut effects = Vec::new();

        match status {
            SlotStatus::Submitted => {
                return Err(DomainError::conflict(
                    ConflictKind::SlotAlreadySubmitted,
                    format!("slot {slot} has already been saved"),
                ));
            }
            SlotStatus::Complete | SlotStatus::Failed => {
                self.states.insert(slot, EntryState::Empty);
                ctx.cart.remove(&slot);
                if let Some(s) = ctx.queue.slot_mut(index) {
                    s.status = SlotStatus::Pending;
                }
                debug!(%slot, "slot reopened for editing");
                effects.push(EntryEffect::Reopened { slot });
            }
            SlotStatus::Pending => {}
        }

        ctx.queue.point_at(Some(index));
        effects.push(EntryEffect::RequestFocus {
            slot,
            field: self.state_of(&slot).focus_field(),
        });
        Ok(effects)
    }

    /// Forget any digits typed for `slot`.
    pub(crate) fn reset(&mut self, slot: &SlotId) {
        self.states.remove(slot);
    }

    fn complete(
        &mut self,
        ctx: &mut EntryContext<'_>,
        index: usize,
        team1: Score,
        team2: Score,
    ) -> Vec<EntryEffect> {
        let Some(slot) = ctx.queue.slot_mut(index) else {
            return Vec::new();
        };
        slot.status = SlotStatus::Complete;
        let result = QueuedResult::from_slot(slot, team1, team2);
        let from = result.id;

        self.states.insert(from, EntryState::Complete { team1, team2 });
        ctx.cart.upsert(result.clone());
        debug!(slot = %from, %team1, %team2, "score entry complete");

        let mut effects = vec![EntryEffect::ResultQueued(result)];
        match ctx.queue.next_incomplete_after(index) {
            Some(next) => {
                ctx.queue.point_at(Some(next));
                if let Some(to) = ctx.queue.get(next).map(|s| s.id) {
                    effects.push(EntryEffect::Advanced { from, to });
                    effects.push(EntryEffect::RequestFocus {
                        slot: to,
                        field: self.state_of(&to).focus_field(),
                    });
                }
            }
            None => {
                ctx.queue.point_at(None);
                effects.push(EntryEffect::Idle);
            }
        }
        effects
    }
}

/// The slot under the cursor, if it still accepts input.
fn editable_slot(ctx: &EntryContext<'_>) -> Option<(usize, SlotId)> {
    let index = ctx.queue.current_index()?;
    let slot = ctx.queue.get(index)?;
    (slot.status == SlotStatus::Pending).then_some((index, slot.id))
}
