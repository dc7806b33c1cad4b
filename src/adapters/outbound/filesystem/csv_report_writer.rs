use crate::ports::outbound::ReportWriter;
use crate::reconciliation::domain::OutputRow;
use crate::reconciliation::services::{report_fields, REPORT_HEADER};
use crate::shared::error::CheckError;
use crate::shared::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// CsvReportWriter adapter for the output report.
///
/// Writing is all-or-nothing: rows are serialized to a temporary file in
/// the destination directory, then atomically renamed over the destination
/// path. A failure at any point leaves no partial report behind.
pub struct CsvReportWriter {
    output_path: PathBuf,
}

impl CsvReportWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn write_error(&self, details: impl Into<String>) -> anyhow::Error {
        CheckError::OutputWrite {
            path: self.output_path.clone(),
            details: details.into(),
        }
        .into()
    }

    fn validate_destination(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(self.write_error(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        // If the file already exists, refuse symlinks so the rename cannot
        // be redirected elsewhere.
        if self.output_path.exists() {
            let metadata = fs::symlink_metadata(&self.output_path)
                .map_err(|e| self.write_error(format!("Failed to read file metadata: {}", e)))?;
            if metadata.is_symlink() {
                return Err(self.write_error(
                    "Security: output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.",
                ));
            }
        }

        Ok(())
    }

    fn parent_dir(&self) -> &Path {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_report(&self, rows: &[OutputRow]) -> Result<()> {
        self.validate_destination()?;

        // Temp file in the destination directory so the final rename stays
        // on one filesystem and is atomic.
        let temp = NamedTempFile::new_in(self.parent_dir())
            .map_err(|e| self.write_error(format!("Failed to create temporary file: {}", e)))?;

        {
            let mut writer = csv::Writer::from_writer(temp.as_file());
            writer
                .write_record(REPORT_HEADER)
                .map_err(|e| self.write_error(e.to_string()))?;
            for row in rows {
                writer
                    .write_record(report_fields(row))
                    .map_err(|e| self.write_error(e.to_string()))?;
            }
            writer
                .flush()
                .map_err(|e| self.write_error(e.to_string()))?;
        }

        temp.persist(&self.output_path)
            .map_err(|e| self.write_error(e.to_string()))?;

        tracing::debug!(path = %self.output_path.display(), rows = rows.len(), "report written");
        Ok(())
    }
}
