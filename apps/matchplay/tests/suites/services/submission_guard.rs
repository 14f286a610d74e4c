use std::sync::Arc;

use matchplay::{AppError, OrderedSubmissionPipeline};

use crate::support::rating_fakes::GatedRatingService;
use crate::support::session_builders::{queued, requester};

#[tokio::test]
async fn overlapping_submit_is_rejected() {
    let service = Arc::new(GatedRatingService::new());
    let pipeline = Arc::new(OrderedSubmissionPipeline::new(service.clone()));
    let items = queued(&[(1, "64"), (2, "46")]);

    let running = {
        let pipeline = pipeline.clone();
        let items = items.clone();
        tokio::spawn(async move { pipeline.submit(&items, &requester()).await })
    };

    service.entered.notified().await;
    assert!(pipeline.is_submitting());

    let err = pipeline.submit(&items, &requester()).await.unwrap_err();
    assert!(matches!(err, AppError::SubmissionInFlight));

    service.open();
    let report = running.await.unwrap().unwrap();
    assert!(report.is_success());
    assert!(!pipeline.is_submitting());
    // the rejected call reached nothing
    assert_eq!(service.inner.calls().len(), 8);
}

#[tokio::test]
async fn guard_is_released_after_a_failed_batch() {
    let service = Arc::new(GatedRatingService::new());
    service.open();
    service
        .inner
        .fail_on(matchplay::SubmissionStage::CreateMatch, 1);
    let pipeline = OrderedSubmissionPipeline::new(service.clone());
    let items = queued(&[(3, "16")]);

    let report = pipeline.submit(&items, &requester()).await.unwrap();
    assert_eq!(report.failed_count(), 1);
    assert!(!pipeline.is_submitting());

    let report = pipeline.submit(&items, &requester()).await.unwrap();
    assert!(report.is_success());
}
