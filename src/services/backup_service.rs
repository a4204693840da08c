use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{backup_file_name, TradingPair};
use crate::models::PriceObservation;

/// Writes `rows` to `path` with a header line, creating parent directories.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?} for writing", path))?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(line, row)| row.with_context(|| format!("Bad row {} in {:?}", line + 2, path)))
        .collect()
}

/// Saves one symbol's observations as `{data_dir}/{SYMBOL}_daily_{HHMM}_prices.csv`.
pub fn write_backup(
    data_dir: &Path,
    sample_time: NaiveTime,
    symbol: &str,
    observations: &[PriceObservation],
) -> Result<PathBuf> {
    let path = data_dir.join(backup_file_name(symbol, sample_time));
    write_csv(&path, observations)?;
    Ok(path)
}

/// Reads the backups of every pair. Missing files are skipped with a warning;
/// finding none at all is an error.
pub fn load_backups(
    data_dir: &Path,
    pairs: &[TradingPair],
    sample_time: NaiveTime,
) -> Result<Vec<PriceObservation>> {
    let mut all = Vec::new();
    let mut files_read = 0;

    for pair in pairs {
        let path = data_dir.join(backup_file_name(&pair.symbol, sample_time));
        if !path.exists() {
            warn!("⚠️ {:?} not found, skipping {}", path, pair.symbol);
            continue;
        }

        let rows: Vec<PriceObservation> = read_csv(&path)?;
        info!("Loaded {} observations for {} from {:?}", rows.len(), pair.symbol, path);
        all.extend(rows);
        files_read += 1;
    }

    if files_read == 0 {
        anyhow::bail!(
            "No CSV backups found in {:?}. Run the `collect` command first.",
            data_dir
        );
    }

    Ok(all)
}
