//! shelfcheck - shelf inventory reconciliation for library collections
//!
//! This library checks a list of physical item barcodes against a remote
//! library catalog and reports every holding of the touched items that is
//! not in the expected "on shelf" state, following hexagonal architecture.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`reconciliation`): Pure reconciliation logic and domain models
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use shelfcheck::prelude::*;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<()> {
//! // Create adapters
//! let barcode_reader = FileSystemBarcodeReader::new();
//! let credential_provider = KeyringCredentialProvider::new(None, None, true);
//! let catalog_client = TindCatalogClient::new(DEFAULT_BASE_URL)?;
//! let report_writer = CsvReportWriter::new(PathBuf::from("report.csv"));
//! let progress_reporter = StderrProgressReporter::new(false, true);
//!
//! // Create use case
//! let use_case = RunCheckUseCase::new(
//!     barcode_reader,
//!     credential_provider,
//!     catalog_client,
//!     report_writer,
//!     progress_reporter,
//!     RetryPolicy::new(3, Duration::from_millis(500)),
//! );
//!
//! // Execute
//! let request = CheckRequest::new(PathBuf::from("barcodes.csv"), PathBuf::from("report.csv"));
//! let response = use_case.execute(request).await?;
//! eprintln!("{} row(s) written", response.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod reconciliation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::credentials::KeyringCredentialProvider;
    pub use crate::adapters::outbound::filesystem::{CsvReportWriter, FileSystemBarcodeReader};
    pub use crate::adapters::outbound::network::{TindCatalogClient, DEFAULT_BASE_URL};
    pub use crate::application::dto::{CheckRequest, CheckResponse};
    pub use crate::application::use_cases::RunCheckUseCase;
    pub use crate::ports::outbound::{
        BarcodeReader, CatalogClient, CatalogError, CredentialProvider, Credentials,
        ProgressReporter, ReportWriter,
    };
    pub use crate::reconciliation::domain::{Barcode, HoldingRecord, OutputRow, RowFlag, ShelfStatus};
    pub use crate::reconciliation::services::{
        ReconciliationEngine, ReconciliationOutcome, RetryPolicy, REPORT_HEADER,
    };
    pub use crate::shared::Result;
}
