//! Telemetry output: CSV file or JSON lines on stdout

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use habitat_core::TelemetryRecord;

/// CSV exporter for telemetry records
///
/// One header row, then one row per record. A missing anomaly score is
/// written as an empty field.
pub struct CsvExporter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl CsvExporter {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }
        let writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;

        log::info!("CSV export started: {}", path.display());
        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    /// Append one record
    pub fn record(&mut self, record: &TelemetryRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("wrote {} rows to {}", self.rows, self.path.display());
        Ok(self.path)
    }
}

/// Destination for a run's telemetry
pub enum TelemetryOutput {
    /// CSV file
    Csv(CsvExporter),
    /// One JSON object per line
    JsonLines(Stdout),
}

impl TelemetryOutput {
    /// CSV when a path is given, JSON lines on stdout otherwise
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::Csv(CsvExporter::create(path)?)),
            None => Ok(Self::JsonLines(io::stdout())),
        }
    }

    /// Emit one record
    pub fn write(&mut self, record: &TelemetryRecord) -> Result<()> {
        match self {
            Self::Csv(exporter) => exporter.record(record),
            Self::JsonLines(stdout) => {
                let mut out = stdout.lock();
                serde_json::to_writer(&mut out, record)?;
                writeln!(out)?;
                Ok(())
            }
        }
    }

    /// Flush any buffered output
    pub fn finish(self) -> Result<()> {
        match self {
            Self::Csv(exporter) => exporter.finish().map(|_| ()),
            Self::JsonLines(stdout) => Ok(stdout.lock().flush()?),
        }
    }
}
