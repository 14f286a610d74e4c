//! Session simulator - drive a scripted scoring session end to end.
//!
//! Picks matchups, pastes scores and submits the cart, either against the
//! in-memory rating service (with optional failure injection) or against the
//! hosted backend configured through `MATCHPLAY_RATING_*`.

mod output;
mod telemetry;
mod types;

use std::process::ExitCode;

use clap::Parser;
use matchplay::domain::{CombinationId, Player, Roster};
use matchplay::rating::RatingService;
use matchplay::{
    AppError, HttpRatingService, InMemoryRatingService, OrderedSubmissionPipeline,
    ScoringSession,
};
use tracing::{info, warn};
use types::{Attempt, StageArg};

#[derive(Parser)]
#[command(name = "session-sim")]
#[command(about = "Run a padel scoring session and submit it to the rating backend")]
struct Args {
    /// The four player ids, the recording player first
    #[arg(long, value_delimiter = ',', default_value = "p1,p2,p3,p4")]
    players: Vec<String>,

    /// Combination numbers (1-3) to queue, in order; repeats allowed
    #[arg(long, value_delimiter = ',', required = true)]
    pick: Vec<u8>,

    /// Two-digit scores pasted into the queue in order, e.g. 64,36
    #[arg(long, value_delimiter = ',')]
    scores: Vec<String>,

    /// Make the in-memory backend fail this stage
    #[arg(long, conflicts_with = "remote")]
    fail_stage: Option<StageArg>,

    /// Which call of --fail-stage fails (1-based)
    #[arg(long, default_value = "1", requires = "fail_stage")]
    fail_at: u32,

    /// Resubmit this many times after a failed batch
    #[arg(long, default_value = "0")]
    retry: u32,

    /// Use the HTTP rating backend from MATCHPLAY_RATING_* env vars
    #[arg(long)]
    remote: bool,

    /// Print the reports as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    telemetry::init_tracing(args.verbose, args.log_json);

    let mut session = build_session(&args)?;
    info!(queued = session.pending_count(), "session ready");

    let attempts = if args.remote {
        let pipeline = OrderedSubmissionPipeline::new(HttpRatingService::from_env()?);
        drive(&mut session, &pipeline, args.retry).await?
    } else {
        let service = InMemoryRatingService::new();
        if let Some(stage) = args.fail_stage {
            service.fail_on(stage.into(), args.fail_at);
        }
        let pipeline = OrderedSubmissionPipeline::new(service);
        drive(&mut session, &pipeline, args.retry).await?
    };

    if args.json {
        output::print_json(&attempts)?;
    } else {
        output::print_text(&attempts);
    }

    let saved = attempts.last().is_some_and(|a| a.report.is_success());
    Ok(if saved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_session(args: &Args) -> Result<ScoringSession, AppError> {
    let players = args
        .players
        .iter()
        .map(|id| Player::new(id.trim(), id.trim()))
        .collect();
    let mut session = ScoringSession::new(Roster::try_from_players(players)?);

    for &n in &args.pick {
        let id = CombinationId::new(n).ok_or_else(|| {
            AppError::invalid(
                matchplay::errors::ErrorCode::UnknownCombination,
                format!("--pick {n}: combinations are numbered 1 to 3"),
            )
        })?;
        session.select(id)?;
    }

    for scores in &args.scores {
        if session.paste(scores).is_empty() {
            return Err(AppError::invalid(
                matchplay::errors::ErrorCode::InvalidScore,
                format!("--scores {scores:?}: expected two digits for an open slot"),
            ));
        }
    }
    Ok(session)
}

async fn drive<R: RatingService>(
    session: &mut ScoringSession,
    pipeline: &OrderedSubmissionPipeline<R>,
    retries: u32,
) -> Result<Vec<Attempt>, AppError> {
    let mut attempts = Vec::new();
    for attempt in 1..=retries + 1 {
        let report = session.submit(pipeline).await?;
        let done = report.is_success();
        if !done {
            warn!(attempt, summary = %report.summary(), "batch stopped early");
        }
        attempts.push(Attempt::new(attempt, report));
        if done {
            break;
        }
    }
    Ok(attempts)
}
