use crate::reconciliation::domain::Barcode;
use crate::shared::Result;
use std::path::Path;

/// BarcodeReader port for parsing the input list of barcodes.
///
/// Accepts either a CSV file (barcode in the first column) or a bare text
/// file with one barcode per line. Blank lines are skipped and fields are
/// trimmed. Order of appearance is preserved; duplicates are kept (the
/// engine decides how to treat them).
///
/// # Errors
/// Fails when the file is unreadable or contains no barcodes.
pub trait BarcodeReader {
    fn read_barcodes(&self, path: &Path) -> Result<Vec<Barcode>>;
}
