use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{MetricsRecord, UnknownMetricPolicy};

type RawSnapshot = HashMap<String, f64>;

/// Accepted layouts for a snapshot file, tried in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    /// `[[snapshot]]` tables in TOML, or `{"snapshot": [...]}` in JSON.
    Batch { snapshot: Vec<RawSnapshot> },
    /// A JSON array of metric objects.
    List(Vec<RawSnapshot>),
    /// A single metric object.
    Single(RawSnapshot),
}

impl SnapshotFile {
    fn into_raw(self) -> Vec<RawSnapshot> {
        match self {
            SnapshotFile::Batch { snapshot } => snapshot,
            SnapshotFile::List(list) => list,
            SnapshotFile::Single(one) => vec![one],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Toml,
}

impl SnapshotFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SnapshotFormat::Toml,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Read every snapshot in `path`, oldest first.
pub fn load_snapshots(path: &Path, policy: UnknownMetricPolicy) -> Result<Vec<MetricsRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;

    let records = parse_snapshots(&content, SnapshotFormat::from_path(path), policy)
        .with_context(|| format!("Invalid snapshot file {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        snapshots = records.len(),
        "loaded metric snapshots"
    );

    Ok(records)
}

pub fn parse_snapshots(
    content: &str,
    format: SnapshotFormat,
    policy: UnknownMetricPolicy,
) -> Result<Vec<MetricsRecord>> {
    let file: SnapshotFile = match format {
        SnapshotFormat::Json => serde_json::from_str(content)?,
        SnapshotFormat::Toml => toml::from_str(content)?,
    };

    let mut records = Vec::new();
    for (index, raw) in file.into_raw().into_iter().enumerate() {
        let record = MetricsRecord::from_raw(raw, policy)
            .with_context(|| format!("snapshot #{}", index + 1))?;
        records.push(record);
    }

    Ok(records)
}
