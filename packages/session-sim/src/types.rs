//! Shared types for the session simulator.

use clap::ValueEnum;
use matchplay::rating::SubmissionStage;
use matchplay::SubmissionReport;
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StageArg {
    CreateMatch,
    InsertSetScore,
    CalculateMmrChange,
    CompleteMatch,
}

impl From<StageArg> for SubmissionStage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::CreateMatch => SubmissionStage::CreateMatch,
            StageArg::InsertSetScore => SubmissionStage::InsertSetScore,
            StageArg::CalculateMmrChange => SubmissionStage::CalculateMmrChange,
            StageArg::CompleteMatch => SubmissionStage::CompleteMatch,
        }
    }
}

/// One submit of the session's cart.
#[derive(Debug, Serialize)]
pub struct Attempt {
    pub attempt: u32,
    pub summary: String,
    pub report: SubmissionReport,
}

impl Attempt {
    pub fn new(attempt: u32, report: SubmissionReport) -> Self {
        Self {
            attempt,
            summary: report.summary(),
            report,
        }
    }
}
