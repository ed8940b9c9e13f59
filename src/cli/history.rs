//! History and forget commands - browse and delete saved profiles

use anyhow::{Context, Result};
use console::style;
use dataprobe::config::UserConfig;
use dataprobe::storage::{
    DatasetRecord, JsonFileMetadataStore, LocalObjectStore, MetadataStore, ObjectStore,
};

fn open_records(config: &UserConfig) -> Result<JsonFileMetadataStore> {
    JsonFileMetadataStore::open(config.data_dir().join("records.json"))
        .context("Failed to open the record store")
}

pub(super) fn list(owner: &str, json: bool, config: &UserConfig) -> Result<()> {
    let records = open_records(config)?.scan_by_owner(owner)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No saved profiles for {}", style(owner).bold());
        return Ok(());
    }

    println!(
        "\n{} saved profiles for {}\n",
        records.len(),
        style(owner).bold()
    );
    println!(
        "{}",
        style("  ID        UPLOADED             ROWS      SCORE  ISSUES  FILE").dim()
    );
    for record in &records {
        println!("  {}", format_row(record));
    }
    println!();
    Ok(())
}

fn format_row(record: &DatasetRecord) -> String {
    let metrics = record.metrics();
    let rows = metrics
        .as_ref()
        .map(|m| m.total_rows.to_string())
        .unwrap_or_else(|| "-".into());
    let score = metrics
        .as_ref()
        .map(|m| format!("{:.1}", m.quality_score))
        .unwrap_or_else(|| "-".into());
    let issues = record
        .issue_count()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".into());
    let short_id: String = record.id.chars().take(8).collect();

    format!(
        "{:<8}  {}  {:>8}  {:>5}  {:>6}  {}",
        short_id,
        record.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
        rows,
        score,
        issues,
        record.filename
    )
}

pub(super) fn forget(id: &str, config: &UserConfig) -> Result<()> {
    let removed = open_records(config)?
        .delete(id)
        .with_context(|| format!("Could not forget {}", id))?;

    let objects = LocalObjectStore::new(config.data_dir().join("objects"));
    let keys = std::iter::once(removed.storage_key.as_str()).chain(removed.report_key.as_deref());
    for key in keys {
        let outcome = objects.delete(key);
        if !outcome.success {
            eprintln!(
                "{} Could not remove {}: {}",
                style("⚠").yellow(),
                key,
                outcome.message.unwrap_or_default()
            );
        }
    }

    println!(
        "{} Forgot {} ({})",
        style("✓").green(),
        style(&removed.filename).cyan(),
        removed.id
    );
    Ok(())
}
