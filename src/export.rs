use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{self, ReportKind};
use crate::config::AnalyticsConfig;
use crate::dataset::Dataset;
use crate::error::Result;

pub fn write_rows<W, T>(writer: W, rows: &[T]) -> Result<()>
where
    W: std::io::Write,
    T: Serialize,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes every tabular report to `<dir>/<kind>.csv` and returns the paths.
pub fn export_all(
    dataset: &Dataset,
    config: &AnalyticsConfig,
    generated_at: DateTime<Utc>,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for kind in ReportKind::ALL.into_iter().filter(ReportKind::is_tabular) {
        let output = catalog::run(kind, dataset, config, generated_at)?;
        let path = dir.join(format!("{}.csv", kind.name()));
        let file = fs::File::create(&path)?;
        output.write_csv(file)?;
        tracing::info!(report = %kind, rows = output.row_count(), path = %path.display(), "Exported report");
        written.push(path);
    }

    Ok(written)
}
