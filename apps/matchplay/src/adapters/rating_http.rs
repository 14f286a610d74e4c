//! JSON RPC client for a hosted rating backend.
//!
//! Each call is `POST {base_url}/rpc/{call}` with a JSON object body,
//! authenticated with the project key in both the `apikey` and bearer
//! headers.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::rating::RatingApiConfig;
use crate::domain::matchups::Team;
use crate::domain::roster::PlayerId;
use crate::error::AppError;
use crate::rating::{
    FinalScores, MatchId, RatingError, RatingService, SubmissionStage, WinDeltas,
};

// error bodies can be whole HTML pages
const MAX_DETAIL_LEN: usize = 200;

pub struct HttpRatingService {
    client: Client,
    config: RatingApiConfig,
}

impl HttpRatingService {
    pub fn new(config: RatingApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(RatingApiConfig::from_env()?)
    }

    fn endpoint(&self, stage: SubmissionStage) -> String {
        rpc_url(&self.config.base_url, stage)
    }

    async fn call(&self, stage: SubmissionStage, body: Value) -> Result<Value, RatingError> {
        let url = self.endpoint(stage);
        debug!(%url, "rating rpc");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport)?;
        check_status(status, &text)?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RatingError::Decode(e.to_string()))
    }
}

pub(crate) fn rpc_url(base_url: &str, stage: SubmissionStage) -> String {
    format!("{}/rpc/{}", base_url.trim_end_matches('/'), stage.as_str())
}

fn map_transport(err: reqwest::Error) -> RatingError {
    if err.is_timeout() {
        RatingError::Timeout
    } else {
        RatingError::Transport(err.to_string())
    }
}

pub(crate) fn check_status(status: StatusCode, body: &str) -> Result<(), RatingError> {
    if status.is_success() {
        return Ok(());
    }
    let mut detail: String = body.trim().chars().take(MAX_DETAIL_LEN).collect();
    if detail.is_empty() {
        detail = status.canonical_reason().unwrap_or("no reason").to_string();
    }
    Err(RatingError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

pub(crate) fn create_match_body(team1: &Team, team2: &Team) -> Value {
    json!({
        "team1_player1": team1.first,
        "team1_player2": team1.second,
        "team2_player1": team2.first,
        "team2_player2": team2.second,
    })
}

pub(crate) fn insert_set_score_body(
    match_id: &MatchId,
    set_number: u8,
    team1_score: u8,
    team2_score: u8,
) -> Value {
    json!({
        "match_id": match_id,
        "set_number": set_number,
        "team1_score": team1_score,
        "team2_score": team2_score,
    })
}

pub(crate) fn complete_match_body(
    match_id: &MatchId,
    final_scores: FinalScores,
    deltas: WinDeltas,
    requesting_player: &PlayerId,
) -> Value {
    json!({
        "match_id": match_id,
        "team1_score": final_scores.team1,
        "team2_score": final_scores.team2,
        "team1_win_delta": deltas.team1_win_delta,
        "team2_win_delta": deltas.team2_win_delta,
        "requesting_player": requesting_player,
    })
}

/// Accepts a bare id, `{"id": ..}` / `{"match_id": ..}`, or a one-row array
/// of either.
pub(crate) fn parse_match_id(value: Value) -> Result<MatchId, RatingError> {
    match value {
        Value::String(id) if !id.is_empty() => Ok(MatchId::new(id)),
        Value::Object(mut row) => row
            .remove("match_id")
            .or_else(|| row.remove("id"))
            .ok_or_else(|| RatingError::Decode("match id missing from response".into()))
            .and_then(parse_match_id),
        Value::Array(rows) => single_row(rows).and_then(parse_match_id),
        other => Err(RatingError::Decode(format!("unexpected match id: {other}"))),
    }
}

pub(crate) fn parse_deltas(value: Value) -> Result<WinDeltas, RatingError> {
    #[derive(Deserialize)]
    struct Row {
        team1_win_delta: f64,
        team2_win_delta: f64,
    }

    let value = match value {
        Value::Array(rows) => single_row(rows)?,
        other => other,
    };
    let row: Row =
        serde_json::from_value(value).map_err(|e| RatingError::Decode(e.to_string()))?;
    Ok(WinDeltas {
        team1_win_delta: row.team1_win_delta,
        team2_win_delta: row.team2_win_delta,
    })
}

fn single_row(rows: Vec<Value>) -> Result<Value, RatingError> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => Ok(row),
        _ => Err(RatingError::Decode(format!("expected one row, got {count}"))),
    }
}

#[async_trait]
impl RatingService for HttpRatingService {
    async fn create_match(&self, team1: &Team, team2: &Team) -> Result<MatchId, RatingError> {
        let value = self
            .call(SubmissionStage::CreateMatch, create_match_body(team1, team2))
            .await?;
        parse_match_id(value)
    }

    async fn insert_set_score(
        &self,
        match_id: &MatchId,
        set_number: u8,
        team1_score: u8,
        team2_score: u8,
    ) -> Result<(), RatingError> {
        self.call(
            SubmissionStage::InsertSetScore,
            insert_set_score_body(match_id, set_number, team1_score, team2_score),
        )
        .await?;
        Ok(())
    }

    async fn calculate_mmr_change(&self, match_id: &MatchId) -> Result<WinDeltas, RatingError> {
        let value = self
            .call(
                SubmissionStage::CalculateMmrChange,
                json!({ "match_id": match_id }),
            )
            .await?;
        parse_deltas(value)
    }

    async fn complete_match(
        &self,
        match_id: &MatchId,
        final_scores: FinalScores,
        deltas: WinDeltas,
        requesting_player: &PlayerId,
    ) -> Result<(), RatingError> {
        self.call(
            SubmissionStage::CompleteMatch,
            complete_match_body(match_id, final_scores, deltas, requesting_player),
        )
        .await?;
        Ok(())
    }
}
