// src/main.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use syllabus_extractor::storage::StorageManager;
use syllabus_extractor::utils::{self, error::StorageError, text_debug, AppError};
use syllabus_extractor::{ParseOutcome, ParserConfig, SyllabusParser};
use tokio::task::JoinSet;

/// Command Line Interface for the syllabus evaluation extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plain-text syllabus files (already converted from PDF/DOCX)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for parse results and reports
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Merge schedule week/date into evaluations before saving
    #[arg(long)]
    link: bool,

    /// Allowed deviation of the weight sum before a warning (overrides SYLLABUS_WEIGHT_TOLERANCE)
    #[arg(long)]
    weight_tolerance: Option<u32>,

    /// Expected weight sum (overrides SYLLABUS_EXPECTED_TOTAL)
    #[arg(long)]
    expected_total: Option<u32>,

    /// Also print each parse result as JSON on stdout
    #[arg(long)]
    stdout: bool,

    /// Debug mode - save a copy of each input with the located sections marked
    #[arg(short, long)]
    debug: bool,
}

/// A parsed input file, kept with its text for debug output.
struct ParsedDocument {
    path: PathBuf,
    text: String,
    outcome: ParseOutcome,
}

fn build_config(args: &Args) -> Result<ParserConfig, AppError> {
    let mut config = ParserConfig::from_env()?;
    if let Some(tolerance) = args.weight_tolerance {
        config = config.with_weight_tolerance(tolerance);
    }
    if let Some(expected) = args.expected_total {
        config = config.with_expected_total(expected);
    }
    Ok(config)
}

/// Reads one input file and parses it on the blocking pool.
async fn process_file(path: PathBuf, parser: Arc<SyllabusParser>) -> Result<ParsedDocument, AppError> {
    let bytes = tokio::fs::read(&path).await?;
    let text = String::from_utf8(bytes).map_err(|e| AppError::Input {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!("Read {} bytes from {}", text.len(), path.display());

    let (text, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = parser.parse(&text);
        (text, outcome)
    })
    .await
    .map_err(|e| AppError::Processing(format!("Parser task failed for {}: {}", path.display(), e)))?;

    Ok(ParsedDocument { path, text, outcome })
}

fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Links (if requested), prints and saves one parsed document.
fn store_document(storage: &StorageManager, args: &Args, document: ParsedDocument) -> Result<(), AppError> {
    let stem = document_stem(&document.path);
    let outcome = if args.link {
        ParseOutcome {
            result: document.outcome.result.linked(),
            ..document.outcome
        }
    } else {
        document.outcome
    };

    tracing::info!(
        "{}: {} evaluations ({:?}), {} schedule entries, total weight {}",
        stem,
        outcome.result.evaluations.len(),
        outcome.strategy,
        outcome.result.schedule.len(),
        outcome.result.total_weight()
    );
    if let Some(diagnostic) = &outcome.diagnostic {
        tracing::warn!("{}: {}", stem, diagnostic);
    }

    if args.stdout {
        let json = serde_json::to_string_pretty(&outcome.result).map_err(StorageError::from)?;
        println!("{}", json);
    }

    storage.save_result(&stem, &outcome.result)?;
    storage.save_report(&stem, &outcome)?;

    if args.debug {
        let debug_path = storage.document_dir(&stem)?.join(format!("{}_sections.txt", stem));
        if let Err(e) = text_debug::create_debug_text(&document.text, &debug_path) {
            tracing::warn!("Failed to create debug text: {}", e);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build parser configuration (env first, CLI flags override)
    let config = build_config(&args)?;
    tracing::debug!("Parser configuration: {:?}", config);
    let parser = Arc::new(SyllabusParser::new(config));

    // 4. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 5. Parse every input concurrently
    let mut tasks = JoinSet::new();
    for path in args.inputs.clone() {
        tasks.spawn(process_file(path, Arc::clone(&parser)));
    }

    let mut success_count = 0;
    let mut failure_count = 0;

    while let Some(joined) = tasks.join_next().await {
        let stored = match joined {
            Ok(Ok(document)) => store_document(&storage, &args, document),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(AppError::Processing(format!("Task failed: {}", e))),
        };
        match stored {
            Ok(()) => success_count += 1,
            Err(e) => {
                tracing::error!("Failed to process document: {}", e);
                failure_count += 1;
            }
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to process any of {} documents", failure_count)));
    }

    Ok(())
}
