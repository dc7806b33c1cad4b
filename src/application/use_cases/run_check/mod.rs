use crate::application::dto::{CheckRequest, CheckResponse};
use crate::ports::outbound::{
    BarcodeReader, CatalogClient, CatalogError, CredentialProvider, ProgressReporter, ReportWriter,
};
use crate::reconciliation::domain::RowFlag;
use crate::reconciliation::services::{ReconciliationEngine, ReconciliationOutcome, RetryPolicy};
use crate::shared::error::CheckError;
use crate::shared::Result;

/// RunCheckUseCase - Core use case for one shelf-check run
///
/// Orchestrates the workflow: read barcodes, obtain credentials and open a
/// catalog session, reconcile every barcode, surface diagnostics, write the
/// report. All infrastructure is injected through the outbound ports.
///
/// # Type Parameters
/// * `BR` - BarcodeReader implementation
/// * `CP` - CredentialProvider implementation
/// * `CC` - CatalogClient implementation
/// * `RW` - ReportWriter implementation
/// * `PR` - ProgressReporter implementation
pub struct RunCheckUseCase<BR, CP, CC, RW, PR> {
    barcode_reader: BR,
    credential_provider: CP,
    catalog_client: CC,
    report_writer: RW,
    progress_reporter: PR,
    retry_policy: RetryPolicy,
}

impl<BR, CP, CC, RW, PR> RunCheckUseCase<BR, CP, CC, RW, PR>
where
    BR: BarcodeReader,
    CP: CredentialProvider,
    CC: CatalogClient,
    RW: ReportWriter,
    PR: ProgressReporter,
{
    /// Creates a new RunCheckUseCase with injected dependencies
    pub fn new(
        barcode_reader: BR,
        credential_provider: CP,
        catalog_client: CC,
        report_writer: RW,
        progress_reporter: PR,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            barcode_reader,
            credential_provider,
            catalog_client,
            report_writer,
            progress_reporter,
            retry_policy,
        }
    }

    /// Executes one reconciliation run.
    ///
    /// # Errors
    /// Fatal conditions (bad input, rejected credentials, unwritable
    /// output, zero resolved barcodes) surface as `CheckError`; per-barcode
    /// problems become warnings and the summary in the response.
    pub async fn execute(&self, request: CheckRequest) -> Result<CheckResponse> {
        // Step 1: Read the input list before any network work
        self.progress_reporter.report(&format!(
            "📖 Reading barcodes from: {}",
            request.input_path.display()
        ));
        let barcodes = self.barcode_reader.read_barcodes(&request.input_path)?;
        self.progress_reporter
            .report(&format!("✅ Found {} barcode(s)", barcodes.len()));

        // Step 2: Credentials and catalog session
        let obtained = self
            .credential_provider
            .obtain()
            .map_err(|e| CheckError::Authentication {
                details: e.to_string(),
            })?;

        self.progress_reporter
            .report("🔐 Authenticating with the catalog ...");
        match self.catalog_client.authenticate(&obtained.credentials).await {
            Ok(()) => {}
            Err(CatalogError::AuthenticationRejected { details }) => {
                return Err(CheckError::Authentication { details }.into());
            }
            Err(other) => {
                anyhow::bail!("Cannot connect to the catalog - try again later ({})", other);
            }
        }

        // Write-after-success: prompted credentials are persisted only now
        // that the catalog accepted them. A store failure is not worth
        // aborting a run that can still produce its report.
        if let Err(e) = self.credential_provider.store_validated(&obtained) {
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: could not store credentials: {}", e));
        }

        // Step 3: Reconcile
        self.progress_reporter
            .report("🔍 Fetching holdings from the catalog ...");
        let engine = ReconciliationEngine::new(self.retry_policy);
        let progress = |done: usize, total: usize| {
            self.progress_reporter
                .report_progress(done, total, Some("Fetching holdings..."));
        };
        let outcome = engine
            .run(&self.catalog_client, &barcodes, Some(&progress))
            .await
            .map_err(|e| match e {
                CatalogError::AuthenticationRejected { details } => {
                    anyhow::Error::from(CheckError::Authentication { details })
                }
                other => anyhow::Error::from(other),
            })?;

        // Step 4: Per-barcode diagnostics
        self.report_diagnostics(&outcome);
        if outcome.resolved == 0 {
            return Err(CheckError::NoRecordsResolved {
                attempted: outcome.attempted(),
            }
            .into());
        }

        // Step 5: Write the report
        self.progress_reporter.report(&format!(
            "📝 Writing report to: {}",
            request.output_path.display()
        ));
        self.report_writer.write_report(&outcome.rows)?;

        let original_rows = outcome
            .rows
            .iter()
            .filter(|r| r.flag == RowFlag::Original)
            .count();
        let added_rows = outcome.rows.len() - original_rows;
        self.progress_reporter.report_completion(&format!(
            "✅ Check complete: {} row(s) written ({} original, {} added)",
            outcome.rows.len(),
            original_rows,
            added_rows
        ));

        Ok(CheckResponse {
            barcodes_read: barcodes.len(),
            rows_written: outcome.rows.len(),
            original_rows,
            added_rows,
            not_found: outcome
                .not_found
                .iter()
                .map(|b| b.as_str().to_string())
                .collect(),
            failed: outcome
                .failed
                .iter()
                .map(|f| (f.barcode.as_str().to_string(), f.reason.clone()))
                .collect(),
        })
    }

    fn report_diagnostics(&self, outcome: &ReconciliationOutcome) {
        for barcode in &outcome.not_found {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: barcode {} was not found in the catalog",
                barcode
            ));
        }
        for failure in &outcome.failed {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: lookup for {} kept failing: {}",
                failure.barcode, failure.reason
            ));
        }
    }
}
