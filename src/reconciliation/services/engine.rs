use crate::ports::outbound::{CatalogClient, CatalogError};
use crate::reconciliation::domain::{Barcode, HoldingRecord, OutputRow};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Bounded retry with exponential backoff for transient lookup failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the attempt following `attempt` (1-based), doubling
    /// each time.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay * (1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// A barcode whose lookup kept failing after all retries.
#[derive(Debug, Clone)]
pub struct LookupFailure {
    pub barcode: Barcode,
    pub reason: String,
}

/// Everything one engine run produced.
#[derive(Debug, Default)]
pub struct ReconciliationOutcome {
    /// Report rows, grouped by requested barcode in input order; within a
    /// group the original row comes first, added rows follow in catalog
    /// order.
    pub rows: Vec<OutputRow>,
    /// Count of distinct barcodes whose item was fetched successfully.
    pub resolved: usize,
    /// Distinct barcodes the catalog does not know.
    pub not_found: Vec<Barcode>,
    /// Distinct barcodes whose lookups exhausted the retry budget.
    pub failed: Vec<LookupFailure>,
}

impl ReconciliationOutcome {
    /// Distinct barcodes that went through resolution.
    pub fn attempted(&self) -> usize {
        self.resolved + self.not_found.len() + self.failed.len()
    }
}

/// Optional side channel for progress: called with (done, total) after
/// each input barcode. Lookups are sequential, so the callback is invoked
/// from the awaiting task only.
pub type ProgressFn<'a> = &'a dyn Fn(usize, usize);

// Run-scoped memo of how a barcode resolved, so an input listing the same
// barcode twice costs one network round trip.
enum CachedLookup {
    Found(Vec<HoldingRecord>),
    Missing,
    Failed(String),
}

/// The core reconciliation algorithm.
///
/// For each requested barcode, in input order: fetch every holding of the
/// barcode's catalog item, emit the matching record as an "original" row
/// (whatever its status), then emit each sibling copy that is not on shelf
/// as an "added" row unless its barcode was already emitted earlier in the
/// run. On-shelf siblings are omitted: the report only surfaces shelf
/// discrepancies.
///
/// Lookups run sequentially; the duplicate-suppression set must advance
/// deterministically between barcodes.
pub struct ReconciliationEngine {
    retry: RetryPolicy,
}

impl ReconciliationEngine {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// Runs reconciliation over `barcodes` against `client`.
    ///
    /// # Errors
    /// Only authentication rejection aborts the run; not-found barcodes and
    /// exhausted transient failures are recorded in the outcome and the run
    /// continues.
    pub async fn run<C>(
        &self,
        client: &C,
        barcodes: &[Barcode],
        progress: Option<ProgressFn<'_>>,
    ) -> Result<ReconciliationOutcome, CatalogError>
    where
        C: CatalogClient + ?Sized,
    {
        let total = barcodes.len();
        let mut cache: HashMap<Barcode, CachedLookup> = HashMap::new();
        let mut emitted: HashSet<Barcode> = HashSet::new();
        let mut outcome = ReconciliationOutcome::default();

        for (idx, barcode) in barcodes.iter().enumerate() {
            if !cache.contains_key(barcode) {
                let resolution = self.resolve(client, barcode).await?;
                match &resolution {
                    CachedLookup::Found(holdings) => {
                        tracing::debug!(
                            barcode = %barcode,
                            holdings = holdings.len(),
                            "resolved item holdings"
                        );
                        outcome.resolved += 1;
                    }
                    CachedLookup::Missing => outcome.not_found.push(barcode.clone()),
                    CachedLookup::Failed(reason) => outcome.failed.push(LookupFailure {
                        barcode: barcode.clone(),
                        reason: reason.clone(),
                    }),
                }
                cache.insert(barcode.clone(), resolution);
            }

            if let Some(CachedLookup::Found(holdings)) = cache.get(barcode) {
                // The requested copy is always reported, even when on shelf;
                // a repeated input barcode re-emits it once per occurrence.
                if let Some(original) = holdings.iter().find(|r| r.barcode == *barcode) {
                    outcome.rows.push(OutputRow::original(original.clone()));
                    emitted.insert(barcode.clone());
                }

                for sibling in holdings {
                    if sibling.barcode != *barcode
                        && !sibling.status.is_on_shelf()
                        && !emitted.contains(&sibling.barcode)
                    {
                        emitted.insert(sibling.barcode.clone());
                        outcome.rows.push(OutputRow::added(sibling.clone()));
                    }
                }
            }

            if let Some(callback) = progress {
                callback(idx + 1, total);
            }
        }

        Ok(outcome)
    }

    // Resolves one barcode, retrying transient failures with backoff.
    // Returns Err only for authentication rejection.
    async fn resolve<C>(
        &self,
        client: &C,
        barcode: &Barcode,
    ) -> Result<CachedLookup, CatalogError>
    where
        C: CatalogClient + ?Sized,
    {
        let mut attempt = 1u32;
        loop {
            match client.lookup(barcode).await {
                Ok(mut holdings) => {
                    // Re-derive the per-item copy count so the invariant
                    // holds regardless of what the adapter filled in.
                    let count = holdings.len();
                    for record in &mut holdings {
                        record.holdings_total = count;
                    }

                    if holdings.iter().any(|r| r.barcode == *barcode) {
                        return Ok(CachedLookup::Found(holdings));
                    }

                    // An item answer that lacks the requested copy violates
                    // the client contract; treat the barcode as unknown.
                    tracing::debug!(
                        barcode = %barcode,
                        "lookup result did not contain the requested barcode"
                    );
                    return Ok(CachedLookup::Missing);
                }
                Err(CatalogError::NotFound { .. }) => return Ok(CachedLookup::Missing),
                Err(err @ CatalogError::AuthenticationRejected { .. }) => return Err(err),
                Err(CatalogError::Transient { details }) => {
                    if attempt >= self.retry.max_attempts() {
                        tracing::debug!(
                            barcode = %barcode,
                            attempts = attempt,
                            "retry budget exhausted"
                        );
                        return Ok(CachedLookup::Failed(details));
                    }
                    let delay = self.retry.delay_after(attempt);
                    tracing::debug!(
                        barcode = %barcode,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        details = %details,
                        "transient failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::domain::ShelfStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn holding(barcode: &str, status: &str, item_id: &str) -> HoldingRecord {
        HoldingRecord {
            barcode: Barcode::new(barcode).unwrap(),
            status: ShelfStatus::new(status),
            call_number: format!("CALL-{}", item_id),
            copy_number: "c.1".to_string(),
            location_code: "sfl".to_string(),
            location_name: "SFL basement books".to_string(),
            catalog_item_id: item_id.to_string(),
            item_type: "Book".to_string(),
            holdings_total: 0,
        }
    }

    /// Scripted catalog: maps a barcode to its item's full holdings list,
    /// with an optional queue of errors returned before the first success.
    struct MockCatalog {
        items: HashMap<String, Vec<HoldingRecord>>,
        queued_errors: Mutex<HashMap<String, Vec<CatalogError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCatalog {
        fn new() -> Self {
            Self {
                items: HashMap::new(),
                queued_errors: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_item(mut self, holdings: Vec<HoldingRecord>) -> Self {
            for record in &holdings {
                self.items
                    .insert(record.barcode.as_str().to_string(), holdings.clone());
            }
            self
        }

        fn queue_error(self, barcode: &str, error: CatalogError) -> Self {
            self.queued_errors
                .lock()
                .unwrap()
                .entry(barcode.to_string())
                .or_default()
                .push(error);
            self
        }

        fn lookups_for(&self, barcode: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.as_str() == barcode)
                .count()
        }
    }

    #[async_trait]
    impl CatalogClient for MockCatalog {
        async fn authenticate(
            &self,
            _credentials: &crate::ports::outbound::Credentials,
        ) -> Result<(), CatalogError> {
            Ok(())
        }

        async fn lookup(&self, barcode: &Barcode) -> Result<Vec<HoldingRecord>, CatalogError> {
            self.calls.lock().unwrap().push(barcode.as_str().to_string());

            if let Some(queue) = self
                .queued_errors
                .lock()
                .unwrap()
                .get_mut(barcode.as_str())
            {
                if !queue.is_empty() {
                    return Err(queue.remove(0));
                }
            }

            match self.items.get(barcode.as_str()) {
                Some(holdings) => Ok(holdings.clone()),
                None => Err(CatalogError::NotFound {
                    barcode: barcode.as_str().to_string(),
                }),
            }
        }
    }

    fn fast_engine() -> ReconciliationEngine {
        ReconciliationEngine::new(RetryPolicy::new(3, Duration::from_millis(1)))
    }

    fn barcodes(list: &[&str]) -> Vec<Barcode> {
        list.iter().map(|b| Barcode::new(*b).unwrap()).collect()
    }

    #[test]
    fn test_retry_policy_backoff_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(500));
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_retry_policy_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_documented_example_scenario() {
        let catalog = MockCatalog::new()
            .with_item(vec![
                holding("35047019298421", "on shelf", "735973"),
                holding("35047018911974", "on loan", "735973"),
            ])
            .with_item(vec![holding("35047016806341", "on shelf", "620997")])
            .with_item(vec![holding("35047013986138", "on shelf", "510122")]);

        let outcome = fast_engine()
            .run(
                &catalog,
                &barcodes(&["35047019298421", "35047016806341", "35047013986138"]),
                None,
            )
            .await
            .unwrap();

        assert_eq!(outcome.rows.len(), 4);
        assert_eq!(outcome.rows[0].flag.as_str(), "original");
        assert_eq!(outcome.rows[0].record.barcode.as_str(), "35047019298421");
        assert_eq!(outcome.rows[1].flag.as_str(), "added");
        assert_eq!(outcome.rows[1].record.barcode.as_str(), "35047018911974");
        assert_eq!(outcome.rows[1].record.status.as_str(), "on loan");
        assert_eq!(outcome.rows[2].flag.as_str(), "original");
        assert_eq!(outcome.rows[2].record.barcode.as_str(), "35047016806341");
        assert_eq!(outcome.rows[3].flag.as_str(), "original");
        assert_eq!(outcome.rows[3].record.barcode.as_str(), "35047013986138");
        assert_eq!(outcome.resolved, 3);
        assert!(outcome.not_found.is_empty());
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn test_single_on_shelf_holdings_yield_one_original_row_each() {
        let catalog = MockCatalog::new()
            .with_item(vec![holding("100", "on shelf", "1")])
            .with_item(vec![holding("200", "on shelf", "2")]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100", "200"]), None)
            .await
            .unwrap();

        assert_eq!(outcome.rows.len(), 2);
        assert!(outcome.rows.iter().all(|r| r.flag.as_str() == "original"));
        assert_eq!(outcome.rows[0].record.barcode.as_str(), "100");
        assert_eq!(outcome.rows[1].record.barcode.as_str(), "200");
    }

    #[tokio::test]
    async fn test_k_discrepant_siblings_yield_k_added_rows() {
        let catalog = MockCatalog::new().with_item(vec![
            holding("100", "on shelf", "9"),
            holding("101", "lost", "9"),
            holding("102", "on loan", "9"),
            holding("103", "on shelf", "9"),
            holding("104", "missing", "9"),
        ]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100"]), None)
            .await
            .unwrap();

        // 1 original + 3 added; the on-shelf sibling 103 is omitted.
        assert_eq!(outcome.rows.len(), 4);
        assert_eq!(outcome.rows[0].flag.as_str(), "original");
        let added: Vec<&str> = outcome.rows[1..]
            .iter()
            .map(|r| r.record.barcode.as_str())
            .collect();
        assert_eq!(added, vec!["101", "102", "104"]);
        assert!(outcome.rows[1..].iter().all(|r| r.flag.as_str() == "added"));
    }

    #[tokio::test]
    async fn test_holdings_total_rederived_from_fetched_set() {
        let catalog = MockCatalog::new().with_item(vec![
            holding("100", "on shelf", "9"),
            holding("101", "lost", "9"),
        ]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100"]), None)
            .await
            .unwrap();

        assert!(outcome.rows.iter().all(|r| r.record.holdings_total == 2));
    }

    #[tokio::test]
    async fn test_sibling_requests_suppress_duplicate_added_rows() {
        let catalog = MockCatalog::new().with_item(vec![
            holding("100", "lost", "9"),
            holding("101", "on loan", "9"),
        ]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100", "101"]), None)
            .await
            .unwrap();

        // 101 shows up as "added" while resolving 100, then again as its own
        // "original" row; 100 is never duplicated as "added".
        let flags: Vec<(&str, &str)> = outcome
            .rows
            .iter()
            .map(|r| (r.flag.as_str(), r.record.barcode.as_str()))
            .collect();
        assert_eq!(
            flags,
            vec![("original", "100"), ("added", "101"), ("original", "101")]
        );
    }

    #[tokio::test]
    async fn test_repeated_input_barcode_looked_up_once_original_re_emitted() {
        let catalog = MockCatalog::new().with_item(vec![
            holding("100", "on shelf", "9"),
            holding("101", "on loan", "9"),
        ]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100", "100"]), None)
            .await
            .unwrap();

        assert_eq!(catalog.lookups_for("100"), 1);
        let flags: Vec<(&str, &str)> = outcome
            .rows
            .iter()
            .map(|r| (r.flag.as_str(), r.record.barcode.as_str()))
            .collect();
        // Second occurrence re-emits the original row; its added sibling is
        // suppressed by the run-wide set.
        assert_eq!(
            flags,
            vec![("original", "100"), ("added", "101"), ("original", "100")]
        );
        assert_eq!(outcome.resolved, 1);
    }

    #[tokio::test]
    async fn test_not_found_barcode_contributes_no_rows_and_run_continues() {
        let catalog = MockCatalog::new().with_item(vec![holding("200", "on shelf", "2")]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["999", "200"]), None)
            .await
            .unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].record.barcode.as_str(), "200");
        assert_eq!(outcome.not_found.len(), 1);
        assert_eq!(outcome.not_found[0].as_str(), "999");
        assert_eq!(outcome.attempted(), 2);
    }

    #[tokio::test]
    async fn test_transient_failures_retried_until_success() {
        let catalog = MockCatalog::new()
            .with_item(vec![holding("100", "on shelf", "1")])
            .queue_error("100", CatalogError::Transient { details: "timeout".into() })
            .queue_error("100", CatalogError::Transient { details: "timeout".into() });

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100"]), None)
            .await
            .unwrap();

        assert_eq!(catalog.lookups_for("100"), 3);
        assert_eq!(outcome.rows.len(), 1);
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_retries_become_per_barcode_failure() {
        let catalog = MockCatalog::new()
            .with_item(vec![holding("200", "on shelf", "2")])
            .queue_error("100", CatalogError::Transient { details: "refused".into() })
            .queue_error("100", CatalogError::Transient { details: "refused".into() });

        let engine = ReconciliationEngine::new(RetryPolicy::new(2, Duration::from_millis(1)));
        let outcome = engine
            .run(&catalog, &barcodes(&["100", "200"]), None)
            .await
            .unwrap();

        assert_eq!(catalog.lookups_for("100"), 2);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].record.barcode.as_str(), "200");
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].barcode.as_str(), "100");
    }

    #[tokio::test]
    async fn test_authentication_rejection_aborts_the_run() {
        let catalog = MockCatalog::new()
            .with_item(vec![holding("200", "on shelf", "2")])
            .queue_error(
                "100",
                CatalogError::AuthenticationRejected { details: "session expired".into() },
            );

        let result = fast_engine()
            .run(&catalog, &barcodes(&["100", "200"]), None)
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::AuthenticationRejected { .. })
        ));
        // 200 was never attempted.
        assert_eq!(catalog.lookups_for("200"), 0);
    }

    #[tokio::test]
    async fn test_contract_violating_answer_treated_as_missing() {
        // Item answer that lacks the requested copy.
        let mut catalog = MockCatalog::new();
        catalog
            .items
            .insert("100".to_string(), vec![holding("101", "lost", "9")]);

        let outcome = fast_engine()
            .run(&catalog, &barcodes(&["100"]), None)
            .await
            .unwrap();

        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.not_found.len(), 1);
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_barcode() {
        let catalog = MockCatalog::new()
            .with_item(vec![holding("100", "on shelf", "1")])
            .with_item(vec![holding("200", "on shelf", "2")]);

        let seen = Mutex::new(Vec::new());
        let callback = |done: usize, total: usize| {
            seen.lock().unwrap().push((done, total));
        };

        fast_engine()
            .run(&catalog, &barcodes(&["100", "200"]), Some(&callback))
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[tokio::test]
    async fn test_idempotent_rows_for_unchanged_catalog() {
        let catalog = MockCatalog::new().with_item(vec![
            holding("100", "on shelf", "9"),
            holding("101", "on loan", "9"),
        ]);
        let input = barcodes(&["100"]);

        let first = fast_engine().run(&catalog, &input, None).await.unwrap();
        let second = fast_engine().run(&catalog, &input, None).await.unwrap();

        assert_eq!(first.rows, second.rows);
    }
}
