/// Domain model for shelf reconciliation: barcodes, holdings, report rows.
pub mod barcode;
pub mod holding;
pub mod output_row;

pub use barcode::Barcode;
pub use holding::{HoldingRecord, ShelfStatus};
pub use output_row::{OutputRow, RowFlag};
