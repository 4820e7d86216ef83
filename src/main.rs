mod config;
mod console;

use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::{Context, Result};
use api::core::app_state::AppState;
use clap::{Parser, Subcommand};
use faq_qa::{LlmGenerator, PipelineBuilder, PipelineHandle};
use faq_store::{DedupMode, EmbeddingsProvider, HashEmbedder, LlmEmbedder};
use tracing::info;

use crate::config::{AppConfig, EmbeddingSource};

#[derive(Debug, Parser)]
#[command(name = "faq-rag-backend", about = "Retrieval-augmented FAQ answering service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Load a FAQ CSV into the store.
    Ingest {
        path: PathBuf,
        /// Skip questions that are already stored.
        #[arg(long)]
        incremental: bool,
    },
    /// Answer one question and print the JSON result.
    Ask {
        question: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Interactive question loop on stdin.
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();
    telemetry::init("info");

    let cli = Cli::parse();
    let cfg = AppConfig::from_env().context("invalid configuration")?;
    let (pipeline, models) = wire(&cfg)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = Arc::new(AppState::new(pipeline, Some(models)));
            api::start(state, &cfg.api_address).await?;
        }
        Command::Ingest { path, incremental } => {
            let mode = if incremental {
                DedupMode::Incremental
            } else {
                DedupMode::Batch
            };
            let report = pipeline.ingest_file(&path, mode).await?;
            info!(
                rows = report.written,
                skipped_duplicates = report.skipped_duplicates,
                skipped_empty = report.skipped_empty,
                "ingest finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Ask { question, top_k } => {
            let p = pipeline.get().await?;
            let res = p.answer(&question, top_k).await?;
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Command::Console => console::run(&pipeline).await?,
    }

    Ok(())
}

/// Builds the model clients and the lazily built pipeline handle.
fn wire(cfg: &AppConfig) -> Result<(Arc<PipelineHandle>, Arc<LlmServiceProfiles>)> {
    let embedding_profile = match &cfg.embedding {
        EmbeddingSource::Llm(c) => Some(c.clone()),
        EmbeddingSource::Hash(_) => None,
    };
    let models = Arc::new(LlmServiceProfiles::new(
        cfg.generation.clone(),
        embedding_profile,
        cfg.health_timeout_secs,
    )?);

    let embedder: Arc<dyn EmbeddingsProvider> = match &cfg.embedding {
        EmbeddingSource::Llm(_) => Arc::new(LlmEmbedder::new(models.clone(), cfg.store.embedding_dim)),
        EmbeddingSource::Hash(dim) => Arc::new(HashEmbedder::new(*dim)),
    };
    let generator = Arc::new(LlmGenerator::new(models.clone()));

    let builder = PipelineBuilder::new(cfg.store.clone(), cfg.qa.clone(), embedder, generator);
    info!(
        backend = ?cfg.store.backend,
        collection = %cfg.store.collection,
        generation = %cfg.generation.model,
        "pipeline configured"
    );
    Ok((Arc::new(PipelineHandle::new(builder)), models))
}
