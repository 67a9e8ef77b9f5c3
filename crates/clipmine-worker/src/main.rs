//! Clip generation command line.
//!
//! Usage: `clipmine <media-url> [instructions]`. Prints the extraction
//! outcome as JSON; Ctrl-C cancels the run.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clipmine_models::{ExtractionOutcome, GenerationPolicy, PlanTier};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use clipmine_worker::logging::init_tracing;
use clipmine_worker::{
    ClipOrchestrator, GeminiClient, GeminiConfig, TranscriptSource, WorkerConfig,
    YtDlpTranscriptSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let mut args = std::env::args().skip(1);
    let media_url = args
        .next()
        .context("usage: clipmine <media-url> [instructions]")?;
    let instructions = args.next();

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let tier = PlanTier::parse(&std::env::var("PLAN_TIER").unwrap_or_default());
    let policy = GenerationPolicy::for_tier(tier);
    info!(%tier, ?policy, "Using generation policy");

    let backend = GeminiClient::new(GeminiConfig::from_env()?)?;
    info!(model = backend.model(), "Gemini backend ready");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            on_signal.cancel();
        }
    });

    let source = YtDlpTranscriptSource::new(&config.work_dir);
    let transcript = match source.fetch(&media_url).await {
        Ok(transcript) => transcript,
        Err(e) => {
            error!("Transcript fetch failed: {}", e);
            let outcome = ExtractionOutcome::Failure {
                reason: e.user_message().to_string(),
                attempts: 0,
            };
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            std::process::exit(1);
        }
    };

    let mut orchestrator = ClipOrchestrator::new(Arc::new(backend), &config);
    if let Some(instructions) = instructions {
        orchestrator = orchestrator.with_instructions(instructions);
    }

    let outcome = orchestrator.execute(&policy, &transcript, &cancel).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
