use crate::ports::outbound::{CatalogClient, CatalogError, Credentials};
use crate::reconciliation::domain::{Barcode, HoldingRecord, ShelfStatus};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Default base URL of the hosted catalog instance.
pub const DEFAULT_BASE_URL: &str = "https://caltech.tind.io";

/// The catalog front-end filters non-browser user agents, so identify as
/// one.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

const TIMEOUT_SECONDS: u64 = 10;

/// Search result rows from the item-table endpoint.
#[derive(Debug, Deserialize)]
struct ItemSearchResponse {
    #[serde(rename = "recordsTotal")]
    records_total: usize,
    data: Vec<ItemRecordDto>,
}

#[derive(Debug, Deserialize)]
struct ItemRecordDto {
    barcode: String,
    id_bibrec: u64,
    #[serde(default)]
    call_no: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    location_name: String,
    #[serde(default)]
    location_code: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    item_type: String,
}

/// Copies of an item from the holdings endpoint.
#[derive(Debug, Deserialize)]
struct HoldingsResponse {
    #[serde(default)]
    holdings: Vec<HoldingDto>,
}

#[derive(Debug, Deserialize)]
struct HoldingDto {
    barcode: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    call_no: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    location_name: String,
    #[serde(default)]
    location_code: String,
    #[serde(default)]
    item_type: Option<String>,
}

/// TindCatalogClient adapter for a TIND-style library information system.
///
/// The catalog is queried by barcode against its item table, which yields
/// the owning bibliographic record id; the record's holdings endpoint then
/// lists every copy. The client assembles one HoldingRecord per copy, so a
/// single `lookup` answers at the item level as the port requires.
///
/// Authentication establishes a cookie session held by the underlying
/// reqwest client for the rest of the run.
pub struct TindCatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl TindCatalogClient {
    pub fn new(base_url: impl Into<String>) -> crate::shared::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn transient(details: impl std::fmt::Display) -> CatalogError {
        CatalogError::Transient {
            details: details.to_string(),
        }
    }

    // The item-table search payload the catalog's list UI sends; only the
    // ordered column needs to be declared, and `length` bounds the answer.
    fn search_payload(barcode: &Barcode) -> serde_json::Value {
        serde_json::json!({
            "columns": [{
                "data": "barcode",
                "name": "barcode",
                "searchable": true,
                "orderable": true,
                "search": {"value": "", "regex": false},
            }],
            "order": [{"column": 0, "dir": "asc"}],
            "search": {"regex": false, "value": format!("barcode:{}", barcode.as_str())},
            "length": 100,
            "draw": 1,
            "start": 0,
            "table_name": "crcITEM",
        })
    }

    fn check_session(status: reqwest::StatusCode) -> Result<(), CatalogError> {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CatalogError::AuthenticationRejected {
                details: format!("HTTP {}", status),
            });
        }
        if !status.is_success() {
            return Err(Self::transient(format!("HTTP {}", status)));
        }
        Ok(())
    }

    async fn search_item(&self, barcode: &Barcode) -> Result<ItemRecordDto, CatalogError> {
        let url = format!("{}/lists/dt_api", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&Self::search_payload(barcode))
            .send()
            .await
            .map_err(|e| Self::transient(e))?;

        Self::check_session(response.status())?;

        let body: ItemSearchResponse = response
            .json()
            .await
            .map_err(|e| Self::transient(format!("unexpected item search response: {}", e)))?;

        if body.data.len() != body.records_total {
            return Err(Self::transient(format!(
                "expected {} records but received {}",
                body.records_total,
                body.data.len()
            )));
        }

        body.data
            .into_iter()
            .find(|item| item.barcode == barcode.as_str())
            .ok_or_else(|| CatalogError::NotFound {
                barcode: barcode.as_str().to_string(),
            })
    }

    async fn fetch_holdings(&self, record_id: u64) -> Result<Vec<HoldingDto>, CatalogError> {
        let url = format!("{}/record/{}/holdings", self.base_url, record_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::transient(e))?;

        Self::check_session(response.status())?;

        let body: HoldingsResponse = response
            .json()
            .await
            .map_err(|e| Self::transient(format!("unexpected holdings response: {}", e)))?;

        Ok(body.holdings)
    }

    fn record_from_item(item: &ItemRecordDto) -> crate::shared::Result<HoldingRecord> {
        Ok(HoldingRecord {
            barcode: Barcode::new(item.barcode.clone())?,
            status: ShelfStatus::new(item.status.clone()),
            call_number: item.call_no.clone(),
            copy_number: item.description.clone(),
            location_code: item.location_code.clone(),
            location_name: item.location_name.clone(),
            catalog_item_id: item.id_bibrec.to_string(),
            item_type: item.item_type.clone(),
            holdings_total: 1,
        })
    }
}

#[async_trait]
impl CatalogClient for TindCatalogClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), CatalogError> {
        let url = format!("{}/api/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": credentials.user,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(|e| Self::transient(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CatalogError::AuthenticationRejected {
                details: format!("HTTP {}", status),
            });
        }
        if !status.is_success() {
            return Err(Self::transient(format!("HTTP {}", status)));
        }

        tracing::debug!(url = %url, "authenticated catalog session established");
        Ok(())
    }

    async fn lookup(&self, barcode: &Barcode) -> Result<Vec<HoldingRecord>, CatalogError> {
        let item = self.search_item(barcode).await?;
        let copies = self.fetch_holdings(item.id_bibrec).await?;

        if copies.is_empty() {
            // Holdings endpoint can answer empty for records mid-migration;
            // fall back to the single copy the item search described.
            tracing::debug!(barcode = %barcode, "empty holdings answer, using item record only");
            let record = Self::record_from_item(&item)
                .map_err(|e| Self::transient(format!("malformed item record: {}", e)))?;
            return Ok(vec![record]);
        }

        let total = copies.len();
        let mut records = Vec::with_capacity(total);
        for copy in &copies {
            let barcode = Barcode::new(copy.barcode.clone())
                .map_err(|e| Self::transient(format!("malformed holding record: {}", e)))?;
            records.push(HoldingRecord {
                barcode,
                status: ShelfStatus::new(copy.status.clone()),
                call_number: copy.call_no.clone(),
                copy_number: copy.description.clone(),
                location_code: copy.location_code.clone(),
                location_name: copy.location_name.clone(),
                catalog_item_id: item.id_bibrec.to_string(),
                item_type: copy
                    .item_type
                    .clone()
                    .unwrap_or_else(|| item.item_type.clone()),
                holdings_total: total,
            });
        }

        tracing::debug!(
            barcode = %barcode,
            record_id = item.id_bibrec,
            copies = records.len(),
            "catalog lookup complete"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn credentials() -> Credentials {
        Credentials::new("librarian", "hunter2")
    }

    fn barcode(code: &str) -> Barcode {
        Barcode::new(code).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(200).json_body(serde_json::json!({"ok": true}));
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        assert!(client.authenticate(&credentials()).await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(401);
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        let result = client.authenticate(&credentials()).await;
        assert!(matches!(
            result,
            Err(CatalogError::AuthenticationRejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_authenticate_server_error_is_transient() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(503);
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        assert!(matches!(
            client.authenticate(&credentials()).await,
            Err(CatalogError::Transient { .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_assembles_all_copies_of_the_item() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/lists/dt_api");
                then.status(200).json_body(serde_json::json!({
                    "recordsTotal": 1,
                    "data": [{
                        "barcode": "35047019298421",
                        "id_bibrec": 735973,
                        "call_no": "QA76.73",
                        "description": "c.1",
                        "location_name": "SFL basement books",
                        "location_code": "sfl",
                        "status": "on shelf",
                        "item_type": "Book",
                    }],
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/record/735973/holdings");
                then.status(200).json_body(serde_json::json!({
                    "holdings": [
                        {
                            "barcode": "35047019298421",
                            "status": "on shelf",
                            "call_no": "QA76.73",
                            "description": "c.1",
                            "location_name": "SFL basement books",
                            "location_code": "sfl",
                        },
                        {
                            "barcode": "35047018911974",
                            "status": "on loan",
                            "call_no": "QA76.73",
                            "description": "c.2",
                            "location_name": "SFL basement books",
                            "location_code": "sfl",
                        },
                    ],
                }));
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        let records = client.lookup(&barcode("35047019298421")).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.catalog_item_id == "735973"));
        assert!(records.iter().all(|r| r.holdings_total == 2));
        // item_type falls back to the item record when a copy omits it
        assert!(records.iter().all(|r| r.item_type == "Book"));
        assert_eq!(records[1].barcode.as_str(), "35047018911974");
        assert_eq!(records[1].status.as_str(), "on loan");
    }

    #[tokio::test]
    async fn test_lookup_unknown_barcode_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/lists/dt_api");
                then.status(200)
                    .json_body(serde_json::json!({"recordsTotal": 0, "data": []}));
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        let result = client.lookup(&barcode("999")).await;
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_lookup_expired_session_is_authentication_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/lists/dt_api");
                then.status(403);
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        assert!(matches!(
            client.lookup(&barcode("100")).await,
            Err(CatalogError::AuthenticationRejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_transient() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/lists/dt_api");
                then.status(500);
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        assert!(matches!(
            client.lookup(&barcode("100")).await,
            Err(CatalogError::Transient { .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_record_count_mismatch_is_transient() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/lists/dt_api");
                then.status(200)
                    .json_body(serde_json::json!({"recordsTotal": 5, "data": []}));
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        assert!(matches!(
            client.lookup(&barcode("100")).await,
            Err(CatalogError::Transient { .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_empty_holdings_falls_back_to_item_record() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/lists/dt_api");
                then.status(200).json_body(serde_json::json!({
                    "recordsTotal": 1,
                    "data": [{
                        "barcode": "35047013986138",
                        "id_bibrec": 510122,
                        "status": "on shelf",
                        "item_type": "Book",
                    }],
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/record/510122/holdings");
                then.status(200).json_body(serde_json::json!({"holdings": []}));
            })
            .await;

        let client = TindCatalogClient::new(server.base_url()).unwrap();
        let records = client.lookup(&barcode("35047013986138")).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].barcode.as_str(), "35047013986138");
        assert_eq!(records[0].holdings_total, 1);
    }
}
