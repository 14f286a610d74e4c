pub mod session;
pub mod submission;

pub use session::ScoringSession;
pub use submission::{
    HaltPoint, OrderedSubmissionPipeline, OutcomeStatus, PlannedStep, StepRecord,
    SubmissionOutcome, SubmissionReport,
};
