//! Survey core
//!
//! Pure and platform-free: the browser glue feeds intents and timestamps in,
//! reads phase and progress back out.

pub mod achievements;
pub mod flow;
pub mod question;
pub mod scoring;
pub mod state;

pub use achievements::{ACHIEVEMENTS, Achievement, AchievementId, evaluate};
pub use flow::{AnswerOutcome, Survey};
pub use question::{Points, Question, QuestionId, QuestionKind, QuestionSet};
pub use scoring::{Reward, base_points, compute_reward};
pub use state::{Phase, Progress, Session};

use thiserror::Error;

/// Errors raised by the survey core
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("question configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question set is empty")]
    Empty,
    #[error("duplicate question id {0}")]
    DuplicateQuestionId(QuestionId),
    #[error("no question is being answered (phase: {0:?})")]
    NotInProgress(Phase),
}
