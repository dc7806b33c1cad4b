use crate::ports::outbound::BarcodeReader;
use crate::reconciliation::domain::Barcode;
use crate::shared::error::CheckError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum input file size for security (10 MB; a barcode list is tiny)
const MAX_INPUT_SIZE: u64 = 10 * 1024 * 1024;

/// FileSystemBarcodeReader adapter for reading the barcode list.
///
/// Accepts a CSV file (barcode in the first column) or a bare text file
/// with one barcode per line; both parse through the csv crate in
/// headerless, flexible mode. Rows whose first field is not barcode-like
/// are skipped, which also drops CSV header rows.
pub struct FileSystemBarcodeReader;

impl FileSystemBarcodeReader {
    pub fn new() -> Self {
        Self
    }

    // Symlink and size checks before touching file contents.
    fn validate_input_file(&self, path: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(path).map_err(|e| CheckError::InputFormat {
            path: path.to_path_buf(),
            details: format!("Failed to read file metadata: {}", e),
        })?;

        if metadata.is_symlink() {
            return Err(CheckError::InputFormat {
                path: path.to_path_buf(),
                details: "Security: input path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
            }
            .into());
        }

        if !metadata.is_file() {
            return Err(CheckError::InputFormat {
                path: path.to_path_buf(),
                details: "Not a regular file".to_string(),
            }
            .into());
        }

        if metadata.len() > MAX_INPUT_SIZE {
            return Err(CheckError::InputFormat {
                path: path.to_path_buf(),
                details: format!(
                    "Security: file is too large ({} bytes). Maximum allowed size is {} bytes.",
                    metadata.len(),
                    MAX_INPUT_SIZE
                ),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for FileSystemBarcodeReader {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeReader for FileSystemBarcodeReader {
    fn read_barcodes(&self, path: &Path) -> Result<Vec<Barcode>> {
        self.validate_input_file(path)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| CheckError::InputFormat {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        let mut barcodes = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CheckError::InputFormat {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

            let Some(first) = record.get(0) else { continue };
            if Barcode::is_barcode_like(first) {
                barcodes.push(Barcode::new(first)?);
            } else {
                tracing::debug!(field = first, "skipping non-barcode row");
            }
        }

        if barcodes.is_empty() {
            return Err(CheckError::InputFormat {
                path: path.to_path_buf(),
                details: "File does not appear to contain barcodes".to_string(),
            }
            .into());
        }

        tracing::debug!(count = barcodes.len(), "read barcodes from input file");
        Ok(barcodes)
    }
}
