/// Filesystem adapters for input and report I/O
mod barcode_file_reader;
mod csv_report_writer;

pub use barcode_file_reader::FileSystemBarcodeReader;
pub use csv_report_writer::CsvReportWriter;
