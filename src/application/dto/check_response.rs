/// CheckResponse - Summary of a completed reconciliation run.
#[derive(Debug, Clone)]
pub struct CheckResponse {
    /// Barcodes read from the input file (duplicates included)
    pub barcodes_read: usize,
    /// Report rows written
    pub rows_written: usize,
    /// Rows flagged "original"
    pub original_rows: usize,
    /// Rows flagged "added"
    pub added_rows: usize,
    /// Barcodes the catalog does not know
    pub not_found: Vec<String>,
    /// Barcodes whose lookups kept failing, with the last reason
    pub failed: Vec<(String, String)>,
}
