//! Profile command - profile a dataset and optionally save it

use super::{check_fail_threshold, emit, insights};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use console::style;
use dataprobe::ai::LlmBackend;
use dataprobe::config::UserConfig;
use dataprobe::models::Severity;
use dataprobe::reporters::{self, OutputFormat, ProfileReport};
use dataprobe::storage::{
    self, DatasetRecord, JsonFileMetadataStore, LocalObjectStore, MetadataStore, ObjectStore,
};
use dataprobe::ProfilingPipeline;
use std::path::Path;
use tracing::warn;

pub(super) struct ProfileOptions {
    pub format: OutputFormat,
    pub output: Option<std::path::PathBuf>,
    pub explain_score: bool,
    pub insights: bool,
    pub backend: Option<LlmBackend>,
    pub save: bool,
    pub owner: Option<String>,
    pub fail_on: Option<Severity>,
}

pub(super) fn run(file: &Path, options: ProfileOptions, config: &UserConfig) -> Result<()> {
    let content =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());

    let pipeline = ProfilingPipeline::new();
    let mut report = ProfileReport::new(pipeline.profile(&content, &filename));

    if options.explain_score {
        report = report.with_score_breakdown();
    }
    if options.insights {
        let result = insights::insight_pass(&pipeline, &report, options.backend, config);
        report = report.with_insights(result);
    }

    let rendered = reporters::report_with_format(&report, options.format)?;
    emit(&rendered, options.format, options.output.as_deref())?;

    if options.save {
        let owner = options.owner.as_deref().unwrap_or_else(|| config.owner());
        let id = save(&content, &filename, owner, &report, config)?;
        eprintln!(
            "{} Saved profile {} for owner {}",
            style("✓").green(),
            style(&id).cyan(),
            style(owner).bold()
        );
    }

    check_fail_threshold(options.fail_on, &report.profile.issues);
    Ok(())
}

/// Store the upload and JSON report, then record the metadata
fn save(
    content: &[u8],
    filename: &str,
    owner: &str,
    report: &ProfileReport,
    config: &UserConfig,
) -> Result<String> {
    let data_dir = config.data_dir();
    let objects = LocalObjectStore::new(data_dir.join("objects"));
    let records = JsonFileMetadataStore::open(data_dir.join("records.json"))
        .context("Failed to open the record store")?;
    save_to(&objects, &records, content, filename, owner, report)
}

/// Write objects first; if the record cannot be created, remove them again
fn save_to(
    objects: &dyn ObjectStore,
    records: &dyn MetadataStore,
    content: &[u8],
    filename: &str,
    owner: &str,
    report: &ProfileReport,
) -> Result<String> {
    let now = Utc::now();
    let mut record = DatasetRecord::new(owner, filename, content.len() as u64, "");
    record.uploaded_at = now;
    record.storage_key = storage::upload_key(owner, filename, now, &record.id);

    let upload = objects.put(&record.storage_key, content, "text/csv");
    if !upload.success {
        bail!(
            "Failed to store upload: {}",
            upload.message.unwrap_or_default()
        );
    }

    let report_key =
        storage::report_key(filename, now, reporters::file_extension(OutputFormat::Json));
    let json = reporters::report_with_format(report, OutputFormat::Json)?;
    let stored = objects.put(
        &report_key,
        json.as_bytes(),
        reporters::content_type(OutputFormat::Json),
    );
    if stored.success {
        record.report_key = Some(report_key);
    } else {
        // The record is still useful without the rendered report
        warn!("Report not stored: {}", stored.message.unwrap_or_default());
    }

    let profile = &report.profile;
    record.set_profile(&profile.metrics, &profile.issues, &profile.status);

    let keys: Vec<String> = std::iter::once(record.storage_key.clone())
        .chain(record.report_key.clone())
        .collect();
    match records.create(record) {
        Ok(id) => Ok(id),
        Err(e) => {
            for key in &keys {
                let outcome = objects.delete(key);
                if !outcome.success {
                    warn!(
                        "Could not remove {}: {}",
                        key,
                        outcome.message.unwrap_or_default()
                    );
                }
            }
            Err(anyhow::Error::new(e).context("Failed to save the record"))
        }
    }
}
