//! Perspective comment-analyzer client and rate-limited batch scorer.

pub mod batch;
pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use batch::{
    BatchScorer, CommentScorer, Pause, Phase, RatePolicy, ScoreReport, ScoreRun, TokioPause,
};
pub use client::PerspectiveClient;
pub use error::PerspectiveError;
pub use types::{score_columns, Attribute, AttributeScores};
