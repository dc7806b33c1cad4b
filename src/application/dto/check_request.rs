use std::path::PathBuf;

/// CheckRequest - Internal request DTO for one reconciliation run.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Path of the barcode list to read
    pub input_path: PathBuf,
    /// Path the CSV report will be written to
    pub output_path: PathBuf,
}

impl CheckRequest {
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
        }
    }
}
