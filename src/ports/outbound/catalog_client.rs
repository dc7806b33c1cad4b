use crate::ports::outbound::Credentials;
use crate::reconciliation::domain::{Barcode, HoldingRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a catalog lookup can produce.
///
/// Only `AuthenticationRejected` is fatal to a run; `NotFound` and
/// `Transient` are per-barcode conditions the engine recovers from.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("The catalog rejected the supplied credentials: {details}")]
    AuthenticationRejected { details: String },

    #[error("Barcode {barcode} was not found in the catalog")]
    NotFound { barcode: String },

    #[error("Transient network failure: {details}")]
    Transient { details: String },
}

/// CatalogClient port for authenticated holdings lookups.
///
/// The remote catalog is queried by barcode but answers at the item level:
/// `lookup` must return ALL sibling holdings of the catalog item the
/// barcode belongs to, not only the record matching the barcode itself.
/// Lookups are pure reads; the only side effect is the remote query.
///
/// # Async Support
/// All methods are async; implementations must be `Send + Sync`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Establishes an authenticated session scoped to this run.
    ///
    /// # Errors
    /// `AuthenticationRejected` when the credentials are refused (fatal to
    /// the run), `Transient` when the service cannot be reached.
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), CatalogError>;

    /// Fetches every holding of the catalog item owning `barcode`.
    ///
    /// Returns at least one record on success; the record whose barcode
    /// equals the requested one is expected to be among them.
    async fn lookup(&self, barcode: &Barcode) -> Result<Vec<HoldingRecord>, CatalogError>;
}
