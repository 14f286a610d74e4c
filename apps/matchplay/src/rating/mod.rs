//! Port to the remote rating backend.
//!
//! The backend owns match persistence and the rating formula. This crate
//! only drives it through four calls, always in the order of
//! [`SubmissionStage::ALL`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::matchups::Team;
use crate::domain::roster::PlayerId;
use crate::errors::ErrorCode;

/// Backend-issued match identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rating change applied if the given side wins, as computed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WinDeltas {
    pub team1_win_delta: f64,
    pub team2_win_delta: f64,
}

/// Sets won per side, sent when finalising a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScores {
    pub team1: u8,
    pub team2: u8,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("request timed out")]
    Timeout,
    #[error("injected failure: {0}")]
    Injected(String),
}

/// The four remote calls, in the only order they may run for one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionStage {
    CreateMatch,
    InsertSetScore,
    CalculateMmrChange,
    CompleteMatch,
}

impl SubmissionStage {
    pub const ALL: [SubmissionStage; 4] = [
        SubmissionStage::CreateMatch,
        SubmissionStage::InsertSetScore,
        SubmissionStage::CalculateMmrChange,
        SubmissionStage::CompleteMatch,
    ];

    /// Remote call name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateMatch => "createMatch",
            Self::InsertSetScore => "insertSetScore",
            Self::CalculateMmrChange => "calculateMmrChange",
            Self::CompleteMatch => "completeMatch",
        }
    }

    /// User-facing text for a failure at this stage.
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::CreateMatch => "failed to create match",
            Self::InsertSetScore => "failed to save set scores",
            Self::CalculateMmrChange => "failed to calculate rating change",
            Self::CompleteMatch => "failed to complete match",
        }
    }

    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::CreateMatch => ErrorCode::CreateMatchFailed,
            Self::InsertSetScore => ErrorCode::InsertSetScoreFailed,
            Self::CalculateMmrChange => ErrorCode::CalculateMmrChangeFailed,
            Self::CompleteMatch => ErrorCode::CompleteMatchFailed,
        }
    }

    pub fn next(&self) -> Option<SubmissionStage> {
        let pos = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(pos + 1).copied()
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote rating backend.
///
/// Every call is at-most-once per invocation. Callers must await each call
/// before issuing the next: later rating deltas depend on ratings moved by
/// earlier matches.
#[async_trait]
pub trait RatingService: Send + Sync {
    async fn create_match(&self, team1: &Team, team2: &Team) -> Result<MatchId, RatingError>;

    async fn insert_set_score(
        &self,
        match_id: &MatchId,
        set_number: u8,
        team1_score: u8,
        team2_score: u8,
    ) -> Result<(), RatingError>;

    async fn calculate_mmr_change(&self, match_id: &MatchId) -> Result<WinDeltas, RatingError>;

    async fn complete_match(
        &self,
        match_id: &MatchId,
        final_scores: FinalScores,
        deltas: WinDeltas,
        requesting_player: &PlayerId,
    ) -> Result<(), RatingError>;
}

#[async_trait]
impl<T: RatingService + ?Sized> RatingService for std::sync::Arc<T> {
    async fn create_match(&self, team1: &Team, team2: &Team) -> Result<MatchId, RatingError> {
        (**self).create_match(team1, team2).await
    }

    async fn insert_set_score(
        &self,
        match_id: &MatchId,
        set_number: u8,
        team1_score: u8,
        team2_score: u8,
    ) -> Result<(), RatingError> {
        (**self)
            .insert_set_score(match_id, set_number, team1_score, team2_score)
            .await
    }

    async fn calculate_mmr_change(&self, match_id: &MatchId) -> Result<WinDeltas, RatingError> {
        (**self).calculate_mmr_change(match_id).await
    }

    async fn complete_match(
        &self,
        match_id: &MatchId,
        final_scores: FinalScores,
        deltas: WinDeltas,
        requesting_player: &PlayerId,
    ) -> Result<(), RatingError> {
        (**self)
            .complete_match(match_id, final_scores, deltas, requesting_player)
            .await
    }
}
