//! One scoring session for a fixed group of four.

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::cart::{QueuedResult, ResultsCart};
use crate::domain::matchups::{generate_combinations, CombinationId, MatchupCombination};
use crate::domain::roster::Roster;
use crate::domain::score_entry::{EntryContext, EntryEffect, ScoreEntryEngine, ScoreField};
use crate::domain::selection::{SelectedMatchup, SelectionQueue, SlotId, SlotStatus};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::rating::RatingService;
use crate::services::submission::{OrderedSubmissionPipeline, OutcomeStatus, SubmissionReport};

/// Ties the queue, score entry and cart together for one roster.
pub struct ScoringSession {
    roster: Roster,
    queue: SelectionQueue,
    engine: ScoreEntryEngine,
    cart: ResultsCart,
    // submission keys of results dropped since the last submit
    stale: Vec<Uuid>,
}

impl ScoringSession {
    pub fn new(roster: Roster) -> Self {
        let queue = SelectionQueue::new(generate_combinations(&roster));
        Self {
            roster,
            queue,
            engine: ScoreEntryEngine::new(),
            cart: ResultsCart::new(),
            stale: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn combinations(&self) -> &[MatchupCombination] {
        self.queue.combinations()
    }

    pub fn queue(&self) -> &SelectionQueue {
        &self.queue
    }

    pub fn cart(&self) -> &ResultsCart {
        &self.cart
    }

    pub fn engine(&self) -> &ScoreEntryEngine {
        &self.engine
    }

    /// Results waiting to be submitted.
    pub fn pending_count(&self) -> usize {
        self.cart.len()
    }

    pub fn select(&mut self, combination: CombinationId) -> Result<SelectedMatchup, DomainError> {
        self.queue.select(combination).cloned()
    }

    pub fn type_key(&mut self, field: ScoreField, key: char) -> Vec<EntryEffect> {
        let (engine, mut ctx) = self.split();
        engine.type_key(&mut ctx, field, key)
    }

    pub fn paste(&mut self, text: &str) -> Vec<EntryEffect> {
        let (engine, mut ctx) = self.split();
        engine.paste(&mut ctx, text)
    }

    pub fn backspace(&mut self, field: ScoreField) -> Vec<EntryEffect> {
        let (engine, mut ctx) = self.split();
        engine.backspace(&mut ctx, field)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<Vec<EntryEffect>, DomainError> {
        let queued_key = self
            .queue
            .slots()
            .get(index)
            .and_then(|slot| self.cart.get(&slot.id))
            .map(|r| r.submission_key);
        let (engine, mut ctx) = self.split();
        let effects = engine.jump_to(&mut ctx, index)?;
        let reopened = effects
            .iter()
            .any(|e| matches!(e, EntryEffect::Reopened { .. }));
        if let Some(key) = queued_key.filter(|_| reopened) {
            self.stale.push(key);
        }
        Ok(effects)
    }

    /// Drop a queued result before submission. Its slot goes back to
    /// pending with empty fields, and takes the cursor if nothing else has it.
    pub fn remove_result(&mut self, id: &SlotId) -> Result<QueuedResult, DomainError> {
        let removed = self.cart.remove(id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::QueuedResult, format!("no queued result for {id}"))
        })?;
        self.engine.reset(id);
        self.queue.set_status(id, SlotStatus::Pending)?;
        self.stale.push(removed.submission_key);
        if self.queue.current_index().is_none() {
            self.queue.point_at(self.queue.position_of(id));
        }
        debug!(slot = %id, "queued result removed");
        Ok(removed)
    }

    /// Send every queued result through `pipeline`.
    ///
    /// Saved results leave the cart and their slots become immutable. The
    /// slot that halted the batch is marked failed and stays queued, as do
    /// results that were never attempted.
    pub async fn submit<R: RatingService>(
        &mut self,
        pipeline: &OrderedSubmissionPipeline<R>,
    ) -> Result<SubmissionReport, AppError> {
        if self.cart.is_empty() {
            return Err(AppError::EmptyBatch);
        }
        for key in self.stale.drain(..) {
            pipeline.forget(&key);
        }

        let items = self.cart.snapshot();
        let report = pipeline
            .submit(&items, self.roster.requesting_player())
            .await?;

        for outcome in &report.outcomes {
            let id = &outcome.queued_result_id;
            match &outcome.status {
                OutcomeStatus::Saved => {
                    self.cart.remove(id);
                    self.queue.set_status(id, SlotStatus::Submitted)?;
                }
                OutcomeStatus::Failed { .. } => {
                    self.queue.set_status(id, SlotStatus::Failed)?;
                }
                OutcomeStatus::NotAttempted => {}
            }
        }
        info!(
            remaining = self.cart.len(),
            summary = %report.summary(),
            "session submit finished"
        );
        Ok(report)
    }

    fn split(&mut self) -> (&mut ScoreEntryEngine, EntryContext<'_>) {
        (
            &mut self.engine,
            EntryContext {
                queue: &mut self.queue,
                cart: &mut self.cart,
            },
        )
    }
}
