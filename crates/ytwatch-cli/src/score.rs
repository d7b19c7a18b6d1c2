//! `ytwatch score`: attribute scores appended to a comment CSV.

use std::path::Path;

use anyhow::Context;
use ytwatch_perspective::{
    score_columns, AttributeScores, BatchScorer, CommentScorer, Pause, Phase, ScoreReport,
};
use ytwatch_store::{read_comment_table, write_scored_table};

/// Loads `input`, scores its `Comment` column, and writes `output` with
/// `Comment` first, the other input columns in their original order, and
/// the seven score columns last.
///
/// # Errors
///
/// Returns an error if `input` cannot be read or has no `Comment` column
/// (nothing is written in that case), or if `output` cannot be written.
/// Individual scoring failures are not errors.
pub(crate) async fn run_score<S, P>(
    scorer: &BatchScorer<S, P>,
    input: &Path,
    output: &Path,
) -> anyhow::Result<ScoreReport>
where
    S: CommentScorer,
    P: Pause,
{
    let policy = scorer.policy();
    tracing::info!(
        phase = %Phase::Idle,
        batch_size = policy.batch_size(),
        cooldown_secs = policy.cooldown().as_secs(),
        "scorer ready"
    );

    tracing::info!(phase = %Phase::Loading, input = %input.display(), "reading comments");
    let table = read_comment_table(input)
        .with_context(|| format!("failed to load comments from {}", input.display()))?;
    let comments: Vec<&str> = table.comments().collect();
    tracing::info!(
        rows = comments.len(),
        batches = policy.batch_count(comments.len()),
        "comments loaded"
    );

    let run = scorer.score_all(&comments).await;

    tracing::info!(phase = %Phase::Saving, output = %output.display(), "writing scores");
    let cells: Vec<Vec<String>> = run.scores.iter().map(AttributeScores::to_cells).collect();
    write_scored_table(output, &table, &score_columns(), &cells)
        .with_context(|| format!("failed to write scores to {}", output.display()))?;

    let report = run.report;
    tracing::info!(
        phase = %Phase::Done,
        rows = report.rows,
        scored = report.scored,
        skipped = report.skipped,
        batches = report.batches,
        cooldowns = report.cooldowns,
        "scoring finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "score_test.rs"]
mod tests;
