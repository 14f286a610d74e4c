//! Ordered submission of queued results to the rating backend.
//!
//! Rating deltas for a later result can depend on ratings moved by an
//! earlier one in the same batch (a shared player), so the batch is run as
//! an explicit plan of `(result, stage)` steps executed strictly one after
//! another. The first failing step halts the batch. Nothing already
//! committed is undone and nothing is retried automatically.
//!
//! Progress is remembered per queued result, keyed by its submission key,
//! until the result's match is completed. Submitting again after a failure
//! resumes each result from the stage after the last one that succeeded,
//! so a match is never created twice for the same result.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::cart::QueuedResult;
use crate::domain::roster::PlayerId;
use crate::domain::selection::SlotId;
use crate::error::AppError;
use crate::rating::{FinalScores, MatchId, RatingError, RatingService, SubmissionStage, WinDeltas};

/// Every result is recorded as a single set.
const SET_NUMBER: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    /// Index into the order-sorted batch.
    pub item: usize,
    pub stage: SubmissionStage,
}

/// One executed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub result_id: SlotId,
    pub stage: SubmissionStage,
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Saved,
    Failed {
        stage: SubmissionStage,
        error: String,
    },
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub queued_result_id: SlotId,
    pub order: u32,
    pub match_id: Option<MatchId>,
    /// Last stage that completed for this result, in this or an earlier batch.
    pub stage_reached: Option<SubmissionStage>,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HaltPoint {
    pub result_id: SlotId,
    pub order: u32,
    pub stage: SubmissionStage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    /// One per submitted result, ascending `order`.
    pub outcomes: Vec<SubmissionOutcome>,
    /// Remote calls in the order they were issued.
    pub steps: Vec<StepRecord>,
}

impl SubmissionReport {
    pub fn saved_count(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Saved))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Failed { .. }))
    }

    pub fn not_attempted_count(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::NotAttempted))
    }

    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Saved)
    }

    /// Where the batch stopped, if it stopped early.
    pub fn halted_at(&self) -> Option<HaltPoint> {
        self.outcomes.iter().find_map(|o| match &o.status {
            OutcomeStatus::Failed { stage, .. } => Some(HaltPoint {
                result_id: o.queued_result_id,
                order: o.order,
                stage: *stage,
            }),
            _ => None,
        })
    }

    /// One-line notification text, e.g. "1 match saved, 0 failed."
    pub fn summary(&self) -> String {
        let saved = self.saved_count();
        let noun = if saved == 1 { "match" } else { "matches" };
        let mut line = format!("{saved} {noun} saved, {} failed", self.failed_count());
        let skipped = self.not_attempted_count();
        if skipped > 0 {
            line.push_str(&format!(", {skipped} not attempted"));
        }
        if let Some(halt) = self.halted_at() {
            line.push_str(&format!(" ({})", halt.stage.failure_message()));
        }
        line.push('.');
        line
    }

    /// `Err(AppError::Remote)` naming the failing stage when the batch halted.
    pub fn into_result(self) -> Result<SubmissionReport, AppError> {
        let failure = self.outcomes.iter().find_map(|o| match &o.status {
            OutcomeStatus::Failed { stage, error } => Some((*stage, error.clone())),
            _ => None,
        });
        match failure {
            Some((stage, detail)) => Err(AppError::Remote { stage, detail }),
            None => Ok(self),
        }
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

#[derive(Debug, Clone, Default)]
struct ItemProgress {
    match_id: Option<MatchId>,
    deltas: Option<WinDeltas>,
    completed: Option<SubmissionStage>,
}

#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Remote(#[from] RatingError),
    #[error("no {0} recorded for this result")]
    MissingProgress(&'static str),
}

struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct OrderedSubmissionPipeline<R> {
    service: R,
    // unfinished results only; an entry goes once its match is completed
    ledger: Mutex<HashMap<Uuid, ItemProgress>>,
    submitting: AtomicBool,
}

impl<R: RatingService> OrderedSubmissionPipeline<R> {
    pub fn new(service: R) -> Self {
        Self {
            service,
            ledger: Mutex::new(HashMap::new()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &R {
        &self.service
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Last stage completed for an unfinished result. `None` once its match
    /// is completed or before anything succeeded.
    pub fn progress_of(&self, key: &Uuid) -> Option<SubmissionStage> {
        self.ledger.lock().get(key).and_then(|p| p.completed)
    }

    /// Drop remembered progress, e.g. after the result was edited.
    pub fn forget(&self, key: &Uuid) {
        self.ledger.lock().remove(key);
    }

    /// Persist `items` in ascending `order`.
    ///
    /// Returns a report even when a remote call fails; the report says how
    /// far the batch got. Only an empty batch or a submit that overlaps a
    /// running one return `Err`.
    pub async fn submit(
        &self,
        items: &[QueuedResult],
        requesting_player: &PlayerId,
    ) -> Result<SubmissionReport, AppError> {
        if items.is_empty() {
            return Err(AppError::EmptyBatch);
        }
        let _guard = SubmittingGuard::acquire(&self.submitting).ok_or_else(|| {
            warn!("submit rejected: another batch is in flight");
            AppError::SubmissionInFlight
        })?;

        let mut batch: Vec<&QueuedResult> = items.iter().collect();
        batch.sort_by_key(|r| r.order);

        let (mut plan, mut outcomes) = self.plan(&batch);
        info!(
            results = batch.len(),
            steps = plan.len(),
            "submitting queued results"
        );

        let mut steps = Vec::with_capacity(plan.len());
        while let Some(step) = plan.pop_front() {
            let item = batch[step.item];
            let outcome = &mut outcomes[step.item];
            debug!(result_id = %item.id, order = item.order, stage = %step.stage, "running step");

            match self.run_step(item, step.stage, requesting_player).await {
                Ok(()) => {
                    steps.push(StepRecord {
                        result_id: item.id,
                        stage: step.stage,
                        ok: true,
                    });
                    outcome.stage_reached = Some(step.stage);
                    if outcome.match_id.is_none() {
                        outcome.match_id = self.match_id_of(&item.submission_key);
                    }
                    if step.stage == SubmissionStage::CompleteMatch {
                        outcome.status = OutcomeStatus::Saved;
                        info!(
                            result_id = %item.id,
                            match_id = ?outcome.match_id,
                            "result saved"
                        );
                    }
                }
                Err(err) => {
                    steps.push(StepRecord {
                        result_id: item.id,
                        stage: step.stage,
                        ok: false,
                    });
                    warn!(
                        result_id = %item.id,
                        order = item.order,
                        stage = %step.stage,
                        error = %err,
                        "{}; halting batch",
                        step.stage.failure_message()
                    );
                    outcome.status = OutcomeStatus::Failed {
                        stage: step.stage,
                        error: err.to_string(),
                    };
                    break;
                }
            }
        }

        let report = SubmissionReport { outcomes, steps };
        info!(
            saved = report.saved_count(),
            failed = report.failed_count(),
            not_attempted = report.not_attempted_count(),
            "submission finished"
        );
        Ok(report)
    }

    /// Expand the batch into steps, skipping stages an unfinished result
    /// already completed in an earlier batch.
    fn plan(&self, batch: &[&QueuedResult]) -> (VecDeque<PlannedStep>, Vec<SubmissionOutcome>) {
        let ledger = self.ledger.lock();
        let mut plan = VecDeque::with_capacity(batch.len() * SubmissionStage::ALL.len());
        let mut outcomes = Vec::with_capacity(batch.len());

        for (item, result) in batch.iter().enumerate() {
            let progress = ledger.get(&result.submission_key);
            let completed = progress.and_then(|p| p.completed);
            let first = completed
                .and_then(|done| done.next())
                .unwrap_or(SubmissionStage::CreateMatch);
            if completed.is_some() {
                debug!(result_id = %result.id, resume_at = %first, "resuming result");
            }

            outcomes.push(SubmissionOutcome {
                queued_result_id: result.id,
                order: result.order,
                match_id: progress.and_then(|p| p.match_id.clone()),
                stage_reached: completed,
                status: OutcomeStatus::NotAttempted,
            });
            plan.extend(
                SubmissionStage::ALL
                    .into_iter()
                    .filter(|stage| *stage >= first)
                    .map(|stage| PlannedStep { item, stage }),
            );
        }
        (plan, outcomes)
    }

    async fn run_step(
        &self,
        item: &QueuedResult,
        stage: SubmissionStage,
        requesting_player: &PlayerId,
    ) -> Result<(), StepError> {
        match stage {
            SubmissionStage::CreateMatch => {
                let match_id = self.service.create_match(&item.team1, &item.team2).await?;
                self.record(&item.submission_key, stage, |p| p.match_id = Some(match_id));
            }
            SubmissionStage::InsertSetScore => {
                let match_id = self.require_match_id(&item.submission_key)?;
                self.service
                    .insert_set_score(
                        &match_id,
                        SET_NUMBER,
                        item.team1_score.get(),
                        item.team2_score.get(),
                    )
                    .await?;
                self.record(&item.submission_key, stage, |_| {});
            }
            SubmissionStage::CalculateMmrChange => {
                let match_id = self.require_match_id(&item.submission_key)?;
                let deltas = self.service.calculate_mmr_change(&match_id).await?;
                self.record(&item.submission_key, stage, |p| p.deltas = Some(deltas));
            }
            SubmissionStage::CompleteMatch => {
                let match_id = self.require_match_id(&item.submission_key)?;
                let deltas = self
                    .ledger
                    .lock()
                    .get(&item.submission_key)
                    .and_then(|p| p.deltas)
                    .ok_or(StepError::MissingProgress("rating change"))?;
                let (team1, team2) = item.set_wins();
                self.service
                    .complete_match(
                        &match_id,
                        FinalScores { team1, team2 },
                        deltas,
                        requesting_player,
                    )
                    .await?;
                self.ledger.lock().remove(&item.submission_key);
            }
        }
        Ok(())
    }

    fn record(&self, key: &Uuid, stage: SubmissionStage, update: impl FnOnce(&mut ItemProgress)) {
        let mut ledger = self.ledger.lock();
        let progress = ledger.entry(*key).or_default();
        update(progress);
        progress.completed = Some(stage);
    }

    fn match_id_of(&self, key: &Uuid) -> Option<MatchId> {
        self.ledger.lock().get(key).and_then(|p| p.match_id.clone())
    }

    fn require_match_id(&self, key: &Uuid) -> Result<MatchId, StepError> {
        self.match_id_of(key)
            .ok_or(StepError::MissingProgress("match id"))
    }
}
