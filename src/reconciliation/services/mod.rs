/// Domain services: the reconciliation engine and the report schema.
pub mod engine;
pub mod report;

pub use engine::{
    LookupFailure, ProgressFn, ReconciliationEngine, ReconciliationOutcome, RetryPolicy,
};
pub use report::{report_fields, row_from_fields, REPORT_HEADER};
