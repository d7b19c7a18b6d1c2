//! Rate-limited batch scoring.
//!
//! Rows are split into contiguous batches of at most `batch_size`. Each
//! batch is scored (optionally with a small bounded number of calls in
//! flight), then the scorer cools down before starting the next batch.
//! No cooldown follows the final batch, so `M` rows in batches of `B`
//! incur `ceil(M / B) - 1` pauses.
//!
//! A failing call never aborts the run: that row's seven scores are
//! recorded as unavailable and the rest of the batch carries on. Output
//! order always matches input order.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::client::PerspectiveClient;
use crate::error::PerspectiveError;
use crate::types::AttributeScores;

/// Anything that can score a single comment.
pub trait CommentScorer {
    fn score(&self, text: &str) -> impl Future<Output = Result<AttributeScores, PerspectiveError>>;
}

impl CommentScorer for PerspectiveClient {
    async fn score(&self, text: &str) -> Result<AttributeScores, PerspectiveError> {
        self.analyze(text).await
    }
}

/// Sleep abstraction so cooldowns can be observed in tests without waiting.
pub trait Pause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Wall-clock pause backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How many calls may be made back to back, and how long to rest afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    batch_size: usize,
    cooldown: Duration,
}

impl RatePolicy {
    pub const DEFAULT_BATCH_SIZE: usize = 59;
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(61);

    /// A zero batch size is raised to one.
    #[must_use]
    pub fn new(batch_size: usize, cooldown: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            cooldown,
        }
    }

    /// Policy for a quota of `calls_per_minute`: one call of headroom per
    /// window and a cooldown a second longer than the window.
    #[must_use]
    pub fn for_quota_per_minute(calls_per_minute: usize) -> Self {
        Self::new(calls_per_minute.saturating_sub(1), Duration::from_secs(61))
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Number of batches needed for `rows` rows.
    #[must_use]
    pub fn batch_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.batch_size)
    }

    /// Number of cooldowns taken for `rows` rows.
    #[must_use]
    pub fn cooldown_count(&self, rows: usize) -> usize {
        self.batch_count(rows).saturating_sub(1)
    }
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BATCH_SIZE, Self::DEFAULT_COOLDOWN)
    }
}

/// Lifecycle of a scoring job, used in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    ScoringBatch,
    CoolingDown,
    Saving,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::ScoringBatch => "scoring-batch",
            Self::CoolingDown => "cooling-down",
            Self::Saving => "saving",
            Self::Done => "done",
        })
    }
}

/// Counters for one scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreReport {
    pub rows: usize,
    pub scored: usize,
    /// Rows left unscored, whether blank or failed.
    pub skipped: usize,
    pub batches: usize,
    pub cooldowns: usize,
}

/// Scores in input order, plus the run's counters.
#[derive(Debug, Clone, Default)]
pub struct ScoreRun {
    pub scores: Vec<AttributeScores>,
    pub report: ScoreReport,
}

enum Outcome {
    Scored(AttributeScores),
    Skipped,
}

/// Drives a [`CommentScorer`] over a table of comments under a [`RatePolicy`].
pub struct BatchScorer<S, P = TokioPause> {
    scorer: S,
    pause: P,
    policy: RatePolicy,
    concurrency: usize,
}

impl<S: CommentScorer, P: Pause> BatchScorer<S, P> {
    /// Creates a scorer that makes one call at a time.
    pub fn new(scorer: S, pause: P, policy: RatePolicy) -> Self {
        Self {
            scorer,
            pause,
            policy,
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` calls in flight within a batch.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn policy(&self) -> RatePolicy {
        self.policy
    }

    /// Scores every comment and returns one [`AttributeScores`] per input row.
    pub async fn score_all<T: AsRef<str>>(&self, comments: &[T]) -> ScoreRun {
        let batch_size = self.policy.batch_size();
        let total_batches = self.policy.batch_count(comments.len());
        let mut run = ScoreRun {
            scores: Vec::with_capacity(comments.len()),
            report: ScoreReport {
                rows: comments.len(),
                ..ScoreReport::default()
            },
        };

        for (index, batch) in comments.chunks(batch_size).enumerate() {
            let offset = index * batch_size;
            tracing::info!(
                phase = %Phase::ScoringBatch,
                batch = index + 1,
                total_batches,
                rows = batch.len(),
                "scoring batch"
            );

            let outcomes: Vec<Outcome> = stream::iter(batch.iter().enumerate())
                .map(|(i, text)| self.score_one(offset + i, text.as_ref()))
                .buffered(self.concurrency)
                .collect()
                .await;

            for outcome in outcomes {
                match outcome {
                    Outcome::Scored(scores) => {
                        run.report.scored += 1;
                        run.scores.push(scores);
                    }
                    Outcome::Skipped => {
                        run.report.skipped += 1;
                        run.scores.push(AttributeScores::unavailable());
                    }
                }
            }
            run.report.batches += 1;

            if index + 1 < total_batches {
                tracing::info!(
                    phase = %Phase::CoolingDown,
                    cooldown_secs = self.policy.cooldown().as_secs(),
                    "waiting before next batch"
                );
                self.pause.pause(self.policy.cooldown()).await;
                run.report.cooldowns += 1;
            }
        }

        run
    }

    async fn score_one(&self, row: usize, text: &str) -> Outcome {
        if text.trim().is_empty() {
            tracing::debug!(row, "blank comment, not sent for scoring");
            return Outcome::Skipped;
        }
        match self.scorer.score(text).await {
            Ok(scores) => Outcome::Scored(scores),
            Err(e) => {
                tracing::warn!(row, error = %e, "scoring failed, row written as N/A");
                Outcome::Skipped
            }
        }
    }
}
