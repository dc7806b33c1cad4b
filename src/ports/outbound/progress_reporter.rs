/// ProgressReporter port for reporting progress during a run.
///
/// This port abstracts user feedback (e.g., to stderr) so the core stays
/// runnable headlessly; reporting is a side channel, never a control-flow
/// dependency.
pub trait ProgressReporter {
    /// Reports an informational progress message.
    fn report(&self, message: &str);

    /// Reports progress with a position out of a total.
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or per-barcode diagnostic.
    fn report_error(&self, message: &str);

    /// Reports completion of an operation.
    fn report_completion(&self, message: &str);
}
