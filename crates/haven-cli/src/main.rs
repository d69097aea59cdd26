//! haven-upload: store listing photos for a property from the command line.
//!
//! Storage is configured from the environment (STORAGE_BACKEND,
//! LOCAL_STORAGE_PATH, S3_BUCKET, ...; `.env` is honored).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use haven_cli::{content_type_for_path, format_progress, init_tracing, retry_hint, UploadReport};
use haven_core::{AppError, Config, SourceImage, UploadProgressEntry};
use haven_processing::{
    FallbackUploader, ImageIngestor, PipelineError, ProgressObserver, ThumbnailGenerator,
    UploadValidator,
};
use haven_storage::create_storage;

#[derive(Parser, Debug)]
#[command(name = "haven-upload")]
#[command(about = "Upload listing photos for a property")]
struct Args {
    /// Property the photos belong to
    #[arg(long, value_name = "ID")]
    property: String,

    /// Store originals only, without generating thumbnails
    #[arg(long)]
    simple: bool,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Image files to upload, in display order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.log();
            eprintln!("Error: {}", e);
            if let Some(hint) = retry_hint(&e) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = Config::from_env()?;
    config.validate()?;
    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        max_file_size_bytes = config.max_file_size_bytes(),
        "Configuration loaded"
    );

    let storage = create_storage(&config).await?;
    let validator = UploadValidator::from_config(&config);
    let files = read_files(&args.files).await?;

    let observer: ProgressObserver = Arc::new(|snapshot: &[UploadProgressEntry]| {
        tracing::info!(progress = %format_progress(snapshot), "Upload progress");
    });

    let (result, used_fallback) = if args.simple {
        let result = FallbackUploader::new(Arc::clone(&storage))
            .with_validator(validator)
            .upload_simple(&files, &args.property, Some(observer))
            .await;
        if result.images.is_empty() {
            let summary = result
                .failure_summary()
                .unwrap_or_else(|| "no images were stored".to_string());
            return Err(PipelineError::NoImagesUploaded(summary).into());
        }
        (result, true)
    } else {
        let outcome = ImageIngestor::new(Arc::clone(&storage), Arc::new(ThumbnailGenerator::new()))
            .with_validator(validator)
            .ingest(&files, &args.property, Some(observer))
            .await?;
        (outcome.result, outcome.used_fallback)
    };

    let report = UploadReport::build(&args.property, storage.as_ref(), &result, used_fallback)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_table();
    }

    if let Some(summary) = result.failure_summary() {
        eprintln!("Warning: {}", summary);
    }

    Ok(())
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<SourceImage>, AppError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(SourceImage::new(name, content_type_for_path(path), data));
    }
    Ok(files)
}
