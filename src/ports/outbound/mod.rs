/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (catalog service, credential store,
/// file system, console).
pub mod barcode_reader;
pub mod catalog_client;
pub mod credential_provider;
pub mod progress_reporter;
pub mod report_writer;

pub use barcode_reader::BarcodeReader;
pub use catalog_client::{CatalogClient, CatalogError};
pub use credential_provider::{
    CredentialError, CredentialProvider, CredentialSource, Credentials, ObtainedCredentials,
};
pub use progress_reporter::ProgressReporter;
pub use report_writer::ReportWriter;
