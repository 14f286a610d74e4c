//! Report printing for the simulator.

use matchplay::services::OutcomeStatus;

use crate::types::Attempt;

pub fn print_text(attempts: &[Attempt]) {
    for attempt in attempts {
        println!("=== Attempt {} ===", attempt.attempt);
        for outcome in &attempt.report.outcomes {
            let status = match &outcome.status {
                OutcomeStatus::Saved => "saved".to_string(),
                OutcomeStatus::Failed { stage, error } => format!("FAILED at {stage}: {error}"),
                OutcomeStatus::NotAttempted => "not attempted".to_string(),
            };
            let match_id = outcome
                .match_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "#{:<3} {:<6} match={:<36} {}",
                outcome.order, outcome.queued_result_id, match_id, status
            );
        }
        println!("{}", attempt.summary);
    }
}

pub fn print_json(attempts: &[Attempt]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(attempts)?);
    Ok(())
}
