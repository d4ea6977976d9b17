//! Artifact writers: the raw availability snapshot, the gap report JSON, and
//! the rendered HTML page.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use crate::models::GapReport;
use crate::provider::ChunkData;

/// Write the untouched chunk payloads to `data/raw.json` under `out_dir`.
/// This is the file to read when a cabin's min-stay rules look wrong.
pub fn write_raw_snapshot(out_dir: &Path, chunks: &[ChunkData]) -> Result<PathBuf> {
    let data_dir = out_dir.join("data");
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let payloads: Vec<&Value> = chunks.iter().map(|chunk| &chunk.raw).collect();
    let path = data_dir.join("raw.json");
    let body = serde_json::to_string_pretty(&payloads)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;

    info!("wrote {} (inspect it for min-stay fields)", path.display());
    Ok(path)
}

/// Write the gap report to `gaps.json` under `out_dir`.
pub fn write_gap_report(out_dir: &Path, report: &GapReport) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let path = out_dir.join("gaps.json");
    let body = serde_json::to_string_pretty(report)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;

    info!("wrote {}", path.display());
    Ok(path)
}

/// Write the rendered report page to `index.html` under `out_dir`.
pub fn write_html(out_dir: &Path, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let path = out_dir.join("index.html");
    fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;

    info!("wrote {}", path.display());
    Ok(path)
}
