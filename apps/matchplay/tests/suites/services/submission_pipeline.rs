use matchplay::adapters::RatingCall;
use matchplay::errors::ErrorCode;
use matchplay::rating::{FinalScores, SubmissionStage};
use matchplay::services::{HaltPoint, OutcomeStatus};
use matchplay::{AppError, InMemoryRatingService, OrderedSubmissionPipeline};

use crate::support::session_builders::{queued, requester};

const ALL: [SubmissionStage; 4] = SubmissionStage::ALL;

#[tokio::test]
async fn three_results_issue_twelve_calls_in_order() {
    let items = queued(&[(1, "64"), (2, "36"), (1, "55")]);
    let pipeline = OrderedSubmissionPipeline::new(InMemoryRatingService::new());

    let report = pipeline.submit(&items, &requester()).await.unwrap();

    let expected: Vec<SubmissionStage> = ALL.iter().copied().cycle().take(12).collect();
    assert_eq!(pipeline.service().stages(), expected);
    assert!(report.is_success());
    assert_eq!(report.saved_count(), 3);
    assert_eq!(report.summary(), "3 matches saved, 0 failed.");

    let traced: Vec<u32> = report
        .steps
        .iter()
        .map(|s| items.iter().find(|i| i.id == s.result_id).unwrap().order)
        .collect();
    assert_eq!(traced, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    assert!(report.steps.iter().all(|s| s.ok));
    assert!(report.outcomes.iter().all(|o| o.match_id.is_some()));
}

#[tokio::test]
async fn calls_carry_scores_set_wins_and_requester() {
    let items = queued(&[(2, "36")]);
    let pipeline = OrderedSubmissionPipeline::new(InMemoryRatingService::new());
    pipeline.submit(&items, &requester()).await.unwrap();

    let calls = pipeline.service().calls();
    match &calls[0] {
        RatingCall::CreateMatch { team1, team2 } => {
            assert_eq!(team1, &items[0].team1);
            assert_eq!(team2, &items[0].team2);
        }
        other => panic!("expected createMatch, got {other:?}"),
    }
    assert!(matches!(
        calls[1],
        RatingCall::InsertSetScore {
            set_number: 1,
            team1_score: 3,
            team2_score: 6,
            ..
        }
    ));
    match &calls[3] {
        RatingCall::CompleteMatch {
            final_scores,
            requesting_player,
            ..
        } => {
            assert_eq!(*final_scores, FinalScores { team1: 0, team2: 1 });
            assert_eq!(requesting_player, &requester());
        }
        other => panic!("expected completeMatch, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_in_first_item_stops_the_batch() {
    let items = queued(&[(1, "64"), (2, "46"), (3, "61")]);
    let service = InMemoryRatingService::new();
    service.fail_on(SubmissionStage::InsertSetScore, 1);
    let pipeline = OrderedSubmissionPipeline::new(service);

    let report = pipeline.submit(&items, &requester()).await.unwrap();

    assert_eq!(
        pipeline.service().stages(),
        vec![SubmissionStage::CreateMatch, SubmissionStage::InsertSetScore]
    );
    assert_eq!(report.saved_count(), 0);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.not_attempted_count(), 2);
    assert_eq!(
        report.halted_at(),
        Some(HaltPoint {
            result_id: items[0].id,
            order: 1,
            stage: SubmissionStage::InsertSetScore,
        })
    );
    assert_eq!(
        report.summary(),
        "0 matches saved, 1 failed, 2 not attempted (failed to save set scores)."
    );
    assert_eq!(report.outcomes[1].status, OutcomeStatus::NotAttempted);
    assert_eq!(
        report.outcomes[0].stage_reached,
        Some(SubmissionStage::CreateMatch)
    );

    let err = report.into_result().unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsertSetScoreFailed);
}

#[tokio::test]
async fn earlier_saves_are_not_rolled_back() {
    let items = queued(&[(1, "64"), (2, "46")]);
    let service = InMemoryRatingService::new();
    service.fail_on(SubmissionStage::CompleteMatch, 2);
    let pipeline = OrderedSubmissionPipeline::new(service);

    let report = pipeline.submit(&items, &requester()).await.unwrap();

    assert_eq!(report.saved_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.summary(), "1 match saved, 1 failed (failed to complete match).");
    assert_eq!(pipeline.service().completed_match_count(), 1);
    assert_eq!(pipeline.service().match_count(), 2);
}

#[tokio::test]
async fn empty_batch_is_rejected_without_calls() {
    let pipeline = OrderedSubmissionPipeline::new(InMemoryRatingService::new());
    let err = pipeline.submit(&[], &requester()).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyBatch));
    assert!(pipeline.service().calls().is_empty());
}

#[tokio::test]
async fn input_is_sorted_by_order_before_running() {
    let mut items = queued(&[(1, "64"), (2, "46"), (3, "61")]);
    items.reverse();
    let pipeline = OrderedSubmissionPipeline::new(InMemoryRatingService::new());

    let report = pipeline.submit(&items, &requester()).await.unwrap();
    let orders: Vec<u32> = report.outcomes.iter().map(|o| o.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let created: Vec<_> = pipeline
        .service()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RatingCall::CreateMatch { team1, .. } => Some(team1),
            _ => None,
        })
        .collect();
    assert_eq!(created, vec![items[2].team1.clone(), items[1].team1.clone(), items[0].team1.clone()]);
}

#[tokio::test]
async fn later_deltas_see_earlier_rating_changes() {
    async fn run(entries: &[(u8, &str)]) -> f64 {
        let pipeline = OrderedSubmissionPipeline::new(InMemoryRatingService::new());
        pipeline.submit(&queued(entries), &requester()).await.unwrap();
        pipeline.service().rating_of(&requester())
    }

    // same two results, opposite order
    let a = run(&[(1, "60"), (1, "06")]).await;
    let b = run(&[(1, "06"), (1, "60")]).await;
    assert!(a < 1500.0, "{a}");
    assert!(b > 1500.0, "{b}");
}
