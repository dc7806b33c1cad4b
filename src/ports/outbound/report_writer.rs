use crate::reconciliation::domain::OutputRow;
use crate::shared::Result;

/// ReportWriter port for serializing the ordered output rows.
///
/// Writing is all-or-nothing: a failure mid-write must not leave a file in
/// place that presents as complete.
pub trait ReportWriter {
    fn write_report(&self, rows: &[OutputRow]) -> Result<()>;
}
