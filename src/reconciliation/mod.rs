/// Reconciliation core: domain model and the engine that turns a barcode
/// list plus catalog answers into report rows.
pub mod domain;
pub mod services;
