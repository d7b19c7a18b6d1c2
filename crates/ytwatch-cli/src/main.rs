mod comments;
mod score;
mod videos;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ytwatch_core::{parse_utc_timestamp, AppConfig};
use ytwatch_perspective::{BatchScorer, PerspectiveClient, RatePolicy, TokioPause};
use ytwatch_youtube::{PublishWindow, YoutubeClient};

#[derive(Debug, Parser)]
#[command(name = "ytwatch")]
#[command(about = "Harvest YouTube video metadata and comments, and score comments for toxicity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List uploads published since the last run for every channel in a handle file
    Videos {
        /// File with one channel handle per line
        #[arg(long, default_value = "channels.txt")]
        channels: PathBuf,
        /// File holding the timestamp of the last completed run
        #[arg(long, default_value = "last_run_time.txt")]
        checkpoint: PathBuf,
        /// Output CSV
        #[arg(long, default_value = "video_info.csv")]
        output: PathBuf,
    },
    /// Download comments and replies on a channel's videos within a publish window
    Comments {
        /// Channel handle or search query; repeat for several channels
        #[arg(long = "handle", required = true)]
        handles: Vec<String>,
        /// Output CSV
        #[arg(long, default_value = "comments.csv")]
        output: PathBuf,
        /// Only videos published at or after this instant (RFC 3339)
        #[arg(long, value_parser = parse_timestamp, default_value = "2024-12-01T00:00:00Z")]
        published_after: DateTime<Utc>,
        /// Only videos published before this instant (RFC 3339)
        #[arg(long, value_parser = parse_timestamp, default_value = "2024-12-08T00:00:00Z")]
        published_before: DateTime<Utc>,
    },
    /// Score a comment CSV with the Perspective API and append the scores
    Score {
        /// Input CSV with a `Comment` column
        #[arg(long)]
        input: PathBuf,
        /// Output CSV
        #[arg(long)]
        output: PathBuf,
        /// Calls per batch (overrides `YTWATCH_SCORE_BATCH_SIZE`)
        #[arg(long, value_parser = parse_positive)]
        batch_size: Option<usize>,
        /// Seconds to wait between batches (overrides `YTWATCH_SCORE_BATCH_DELAY_SECS`)
        #[arg(long)]
        delay_secs: Option<u64>,
        /// Calls in flight within a batch (overrides `YTWATCH_SCORE_CONCURRENCY`)
        #[arg(long, value_parser = parse_positive)]
        concurrency: Option<usize>,
    },
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_utc_timestamp(raw).map_err(|e| e.to_string())
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ytwatch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    match cli.command {
        Commands::Videos {
            channels,
            checkpoint,
            output,
        } => {
            let client = youtube_client(&config)?;
            let summary = videos::run_videos(&client, &channels, &checkpoint, &output).await?;
            println!(
                "wrote {} videos from {} channels to {} ({} channels skipped)",
                summary.videos,
                summary.channels,
                output.display(),
                summary.channels_skipped
            );
        }
        Commands::Comments {
            handles,
            output,
            published_after,
            published_before,
        } => {
            anyhow::ensure!(
                published_after < published_before,
                "--published-after must be earlier than --published-before"
            );
            let window = PublishWindow {
                after: published_after,
                before: published_before,
            };
            let client = youtube_client(&config)?;
            let summary = comments::run_comments(&client, &handles, &window, &output).await?;
            println!(
                "wrote {} comment rows from {} videos to {}",
                summary.rows,
                summary.videos,
                output.display()
            );
        }
        Commands::Score {
            input,
            output,
            batch_size,
            delay_secs,
            concurrency,
        } => {
            let policy = RatePolicy::new(
                batch_size.unwrap_or(config.score_batch_size),
                Duration::from_secs(delay_secs.unwrap_or(config.score_batch_delay_secs)),
            );
            let scorer = BatchScorer::new(perspective_client(&config)?, TokioPause, policy)
                .with_concurrency(concurrency.unwrap_or(config.score_concurrency));
            let report = score::run_score(&scorer, &input, &output).await?;
            println!(
                "scored {} of {} comments ({} skipped) in {} batches with {} cooldowns; results saved to {}",
                report.scored,
                report.rows,
                report.skipped,
                report.batches,
                report.cooldowns,
                output.display()
            );
        }
    }

    Ok(())
}

fn youtube_client(config: &AppConfig) -> anyhow::Result<YoutubeClient> {
    let api_key = config.require_youtube_api_key()?;
    let client = YoutubeClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.youtube_base_url,
    )
    .context("failed to build YouTube client")?;
    Ok(client.with_retry(config.max_retries, config.retry_backoff_base_ms))
}

fn perspective_client(config: &AppConfig) -> anyhow::Result<PerspectiveClient> {
    let api_key = config.require_perspective_api_key()?;
    let client = PerspectiveClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.perspective_base_url,
    )
    .context("failed to build Perspective client")?;
    Ok(client.with_retry(config.max_retries, config.retry_backoff_base_ms))
}
