use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docintel::config::Config;
use docintel::models::AnalysisType;
use docintel::pipeline::{DocumentPipeline, ExtractionOptions};
use docintel::storage::LocalDocumentStore;
use docintel::{llm, ocr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "docintel")]
#[command(about = "Extract text from legal documents and run AI analysis on it")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to config/docintel.toml, ./docintel.toml, ~/.config/docintel/docintel.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the text of a document and print the outcome as JSON
    #[command(name = "extract")]
    Extract {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Declared mime type (guessed from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,
        /// Skip cached text and prefer OCR for PDFs
        #[arg(long)]
        force_ocr: bool,
    },
    /// Extract then analyze a document and print the outcome as JSON
    #[command(name = "analyze")]
    Analyze {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// key_terms, risks or summary
        #[arg(long = "type", value_name = "TYPE", value_parser = AnalysisType::from_str)]
        analysis_type: AnalysisType,
        #[arg(long)]
        mime: Option<String>,
        #[arg(long)]
        force_ocr: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "docintel=debug" } else { "docintel=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Register `file` in a store rooted at its directory and build the pipeline
async fn prepare(
    config: &Config,
    file: &Path,
    mime: Option<&str>,
) -> Result<(DocumentPipeline, String, String)> {
    let path = if file.is_relative() {
        config.storage.root_path().join(file)
    } else {
        file.to_path_buf()
    };
    let path = path
        .canonicalize()
        .with_context(|| format!("File not found: {}", path.display()))?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .context("File has no parent directory")?;

    let store = Arc::new(LocalDocumentStore::new(root));
    let (document, version) = store
        .register_file(&path, mime)
        .await
        .with_context(|| format!("Failed to register {}", path.display()))?;

    let pipeline = DocumentPipeline::new(
        store,
        ocr::from_config(&config.ocr),
        llm::from_config(&config.inference),
        config,
    );
    Ok((pipeline, document.id, version.id))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let json = match cli.command {
        Commands::Extract {
            file,
            mime,
            force_ocr,
        } => {
            let (pipeline, document_id, version_id) =
                prepare(&config, &file, mime.as_deref()).await?;
            let outcome = pipeline
                .extract(&document_id, &version_id, ExtractionOptions { force_ocr })
                .await;
            serde_json::to_string_pretty(&outcome)?
        }
        Commands::Analyze {
            file,
            analysis_type,
            mime,
            force_ocr,
        } => {
            let (pipeline, document_id, version_id) =
                prepare(&config, &file, mime.as_deref()).await?;
            let outcome = pipeline
                .analyze(
                    &document_id,
                    &version_id,
                    analysis_type,
                    ExtractionOptions { force_ocr },
                )
                .await;
            serde_json::to_string_pretty(&outcome)?
        }
    };

    println!("{}", json);
    Ok(())
}
