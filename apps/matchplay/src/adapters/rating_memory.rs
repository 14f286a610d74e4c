//! Process-local rating backend.
//!
//! Used by tests and the session simulator. The delta rule is a plain Elo
//! stand-in, only there so that ratings moved by one match visibly change
//! the deltas of the next.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;
use uuid::Uuid;

use crate::domain::matchups::Team;
use crate::domain::roster::PlayerId;
use crate::rating::{
    FinalScores, MatchId, RatingError, RatingService, SubmissionStage, WinDeltas,
};

pub const INITIAL_RATING: f64 = 1500.0;
const K_FACTOR: f64 = 32.0;

/// A call as received, recorded before any injected failure is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingCall {
    CreateMatch {
        team1: Team,
        team2: Team,
    },
    InsertSetScore {
        match_id: MatchId,
        set_number: u8,
        team1_score: u8,
        team2_score: u8,
    },
    CalculateMmrChange {
        match_id: MatchId,
    },
    CompleteMatch {
        match_id: MatchId,
        final_scores: FinalScores,
        deltas: WinDeltas,
        requesting_player: PlayerId,
    },
}

impl RatingCall {
    pub fn stage(&self) -> SubmissionStage {
        match self {
            RatingCall::CreateMatch { .. } => SubmissionStage::CreateMatch,
            RatingCall::InsertSetScore { .. } => SubmissionStage::InsertSetScore,
            RatingCall::CalculateMmrChange { .. } => SubmissionStage::CalculateMmrChange,
            RatingCall::CompleteMatch { .. } => SubmissionStage::CompleteMatch,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredMatch {
    team1: Team,
    team2: Team,
    sets: Vec<(u8, u8, u8)>,
    completed: bool,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RatingCall>,
    matches: HashMap<MatchId, StoredMatch>,
    ratings: HashMap<PlayerId, f64>,
    seen: HashMap<SubmissionStage, u32>,
    // (stage, 1-based occurrence)
    failures: Vec<(SubmissionStage, u32)>,
}

impl State {
    fn rating(&self, player: &PlayerId) -> f64 {
        self.ratings.get(player).copied().unwrap_or(INITIAL_RATING)
    }

    fn team_rating(&self, team: &Team) -> f64 {
        (self.rating(&team.first) + self.rating(&team.second)) / 2.0
    }

    fn adjust(&mut self, team: &Team, delta: f64) {
        for player in [&team.first, &team.second] {
            let current = self.rating(player);
            self.ratings.insert(player.clone(), current + delta);
        }
    }

    /// Record the call and apply any failure armed for it.
    fn admit(&mut self, call: RatingCall) -> Result<(), RatingError> {
        let stage = call.stage();
        self.calls.push(call);
        let seen = self.seen.entry(stage).or_insert(0);
        *seen += 1;
        let occurrence = *seen;

        if let Some(pos) = self
            .failures
            .iter()
            .position(|&(s, n)| s == stage && n == occurrence)
        {
            self.failures.remove(pos);
            return Err(RatingError::Injected(format!("{stage} call #{occurrence}")));
        }
        Ok(())
    }

    fn open_match(&mut self, match_id: &MatchId) -> Result<&mut StoredMatch, RatingError> {
        let stored = self.matches.get_mut(match_id).ok_or_else(|| RatingError::Rejected {
            status: 404,
            detail: format!("match {match_id} does not exist"),
        })?;
        if stored.completed {
            return Err(RatingError::Rejected {
                status: 409,
                detail: format!("match {match_id} is already completed"),
            });
        }
        Ok(stored)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRatingService {
    state: Mutex<State>,
}

impl InMemoryRatingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rating(self, player: impl Into<PlayerId>, rating: f64) -> Self {
        self.state.lock().ratings.insert(player.into(), rating);
        self
    }

    /// Fail the `occurrence`-th call (1-based, counted across the service's
    /// lifetime) of `stage`. Each armed failure fires once.
    pub fn fail_on(&self, stage: SubmissionStage, occurrence: u32) {
        self.state.lock().failures.push((stage, occurrence));
    }

    pub fn calls(&self) -> Vec<RatingCall> {
        self.state.lock().calls.clone()
    }

    pub fn stages(&self) -> Vec<SubmissionStage> {
        self.state.lock().calls.iter().map(RatingCall::stage).collect()
    }

    pub fn rating_of(&self, player: &PlayerId) -> f64 {
        self.state.lock().rating(player)
    }

    pub fn match_count(&self) -> usize {
        self.state.lock().matches.len()
    }

    pub fn completed_match_count(&self) -> usize {
        self.state.lock().matches.values().filter(|m| m.completed).count()
    }
}

#[async_trait]
impl RatingService for InMemoryRatingService {
    async fn create_match(&self, team1: &Team, team2: &Team) -> Result<MatchId, RatingError> {
        let mut state = self.state.lock();
        state.admit(RatingCall::CreateMatch {
            team1: team1.clone(),
            team2: team2.clone(),
        })?;

        let match_id = MatchId::new(Uuid::new_v4().to_string());
        state.matches.insert(
            match_id.clone(),
            StoredMatch {
                team1: team1.clone(),
                team2: team2.clone(),
                sets: Vec::new(),
                completed: false,
            },
        );
        trace!(%match_id, "match created");
        Ok(match_id)
    }

    async fn insert_set_score(
        &self,
        match_id: &MatchId,
        set_number: u8,
        team1_score: u8,
        team2_score: u8,
    ) -> Result<(), RatingError> {
        let mut state = self.state.lock();
        state.admit(RatingCall::InsertSetScore {
            match_id: match_id.clone(),
            set_number,
            team1_score,
            team2_score,
        })?;
        state
            .open_match(match_id)?
            .sets
            .push((set_number, team1_score, team2_score));
        Ok(())
    }

    async fn calculate_mmr_change(&self, match_id: &MatchId) -> Result<WinDeltas, RatingError> {
        let mut state = self.state.lock();
        state.admit(RatingCall::CalculateMmrChange {
            match_id: match_id.clone(),
        })?;
        let (team1, team2) = {
            let stored = state.open_match(match_id)?;
            (stored.team1.clone(), stored.team2.clone())
        };

        let gap = state.team_rating(&team2) - state.team_rating(&team1);
        let expected1 = 1.0 / (1.0 + 10f64.powf(gap / 400.0));
        Ok(WinDeltas {
            team1_win_delta: K_FACTOR * (1.0 - expected1),
            team2_win_delta: K_FACTOR * expected1,
        })
    }

    async fn complete_match(
        &self,
        match_id: &MatchId,
        final_scores: FinalScores,
        deltas: WinDeltas,
        requesting_player: &PlayerId,
    ) -> Result<(), RatingError> {
        let mut state = self.state.lock();
        state.admit(RatingCall::CompleteMatch {
            match_id: match_id.clone(),
            final_scores,
            deltas,
            requesting_player: requesting_player.clone(),
        })?;
        let (team1, team2) = {
            let stored = state.open_match(match_id)?;
            if stored.sets.is_empty() {
                return Err(RatingError::Rejected {
                    status: 422,
                    detail: format!("match {match_id} has no set scores"),
                });
            }
            stored.completed = true;
            (stored.team1.clone(), stored.team2.clone())
        };

        match final_scores.team1.cmp(&final_scores.team2) {
            std::cmp::Ordering::Greater => {
                state.adjust(&team1, deltas.team1_win_delta);
                state.adjust(&team2, -deltas.team1_win_delta);
            }
            std::cmp::Ordering::Less => {
                state.adjust(&team2, deltas.team2_win_delta);
                state.adjust(&team1, -deltas.team2_win_delta);
            }
            std::cmp::Ordering::Equal => {}
        }
        trace!(%match_id, "match completed");
        Ok(())
    }
}
