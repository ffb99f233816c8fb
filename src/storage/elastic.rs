//! Elasticsearch backend.
//!
//! Talks to the cluster through its REST API with `reqwest`:
//! - an index template `<base>` applies settings and mappings to every
//!   `<base>-*` index created later
//! - batches are sent to `/_bulk` as NDJSON
//! - `delete_matching` lists the matching indexes and deletes them one by one

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::config::{ELASTIC_CONNECT_TIMEOUT, ELASTIC_REQUEST_TIMEOUT};
use crate::error_handling::BackendError;
use crate::record::destination_pattern;
use crate::storage::backend::{Backend, BulkItem, BulkReport};

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Backend writing documents to daily Elasticsearch indexes.
pub struct ElasticBackend {
    client: Client,
    host: String,
}

impl ElasticBackend {
    /// Connects to `host` and installs the index template for `index_base`.
    ///
    /// # Errors
    ///
    /// - `BackendError::Config` if `host` is not an http(s) URL
    /// - `BackendError::Http` / `BackendError::Status` if the cluster cannot
    ///   be reached or refuses the template
    pub async fn connect(host: &str, index_base: &str) -> Result<Self, BackendError> {
        let url = Url::parse(host)
            .map_err(|e| BackendError::Config(format!("invalid Elasticsearch URL {host:?}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(BackendError::Config(format!(
                "unsupported scheme {:?} in Elasticsearch URL {host:?}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .connect_timeout(ELASTIC_CONNECT_TIMEOUT)
            .timeout(ELASTIC_REQUEST_TIMEOUT)
            .build()?;

        let backend = ElasticBackend {
            client,
            host: url.as_str().trim_end_matches('/').to_string(),
        };
        backend.ping().await?;
        backend.install_template(index_base).await?;
        Ok(backend)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let response = self.client.get(self.endpoint("/")).send().await?;
        let info: Value = ensure_success(response).await?.json().await?;
        log::info!(
            "Connected to Elasticsearch {} at {}",
            info["version"]["number"].as_str().unwrap_or("(unknown version)"),
            self.host
        );
        Ok(())
    }

    async fn install_template(&self, index_base: &str) -> Result<(), BackendError> {
        let path = format!("/_index_template/{}", index_base);
        let response = self
            .client
            .put(self.endpoint(&path))
            .json(&index_template(index_base))
            .send()
            .await?;
        ensure_success(response).await?;
        log::debug!("Installed index template {}", index_base);
        Ok(())
    }
}

/// Template applied to every `<base>-*` index.
fn index_template(index_base: &str) -> Value {
    let keyword = json!({ "type": "keyword" });
    json!({
        "index_patterns": [destination_pattern(index_base)],
        "priority": 1,
        "template": {
            "settings": { "number_of_shards": 1 },
            "mappings": {
                "properties": {
                    "time": { "type": "date" },
                    "client_time": { "type": "date" },
                    "remote": keyword,
                    "remote_ip": { "type": "ip" },
                    "method": keyword,
                    "uri": keyword,
                    "protocol": keyword,
                    "status": { "type": "short" },
                    "payload_size": { "type": "long" },
                    "country": keyword,
                    "city": keyword,
                    "timezone": keyword,
                    "location": { "type": "geo_point" }
                }
            }
        }
    })
}

/// Builds the NDJSON body of a `_bulk` request.
fn bulk_body(items: &[BulkItem]) -> Result<String, BackendError> {
    let mut body = String::new();
    for item in items {
        let action = json!({
            "index": {
                "_index": item.destination,
                "_id": item.key
            }
        });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&item.document)?);
        body.push('\n');
    }
    Ok(body)
}

/// Counts per-item outcomes of a `_bulk` response.
fn bulk_report(response: &Value, sent: usize) -> BulkReport {
    let Some(items) = response["items"].as_array() else {
        if response["errors"].as_bool().unwrap_or(false) {
            return BulkReport {
                succeeded: 0,
                failed: sent,
            };
        }
        return BulkReport::success(sent);
    };

    let mut report = BulkReport::default();
    for item in items {
        let status = item
            .as_object()
            .and_then(|op| op.values().next())
            .and_then(|result| result["status"].as_u64())
            .unwrap_or(0);
        if (200..300).contains(&status) {
            report.succeeded += 1;
        } else {
            if let Some(reason) = item
                .as_object()
                .and_then(|op| op.values().next())
                .and_then(|result| result["error"]["reason"].as_str())
            {
                log::debug!("Bulk item rejected: {}", reason);
            }
            report.failed += 1;
        }
    }
    report
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Backend for ElasticBackend {
    async fn open_or_create(&self, destination: &str) -> Result<(), BackendError> {
        let response = self.client.head(self.endpoint(destination)).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status != StatusCode::NOT_FOUND {
            return ensure_success(response).await.map(|_| ());
        }

        log::info!("Creating index {}", destination);
        let response = self.client.put(self.endpoint(destination)).send().await?;
        match ensure_success(response).await {
            Ok(_) => Ok(()),
            // Created concurrently by another importer.
            Err(BackendError::Status { status: 400, body }) if body.contains(ALREADY_EXISTS) => {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn write_batch(&self, items: Vec<BulkItem>) -> Result<BulkReport, BackendError> {
        if items.is_empty() {
            return Ok(BulkReport::default());
        }

        let body = bulk_body(&items)?;
        let response = self
            .client
            .post(self.endpoint("/_bulk"))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        let result: Value = ensure_success(response).await?.json().await?;

        let report = bulk_report(&result, items.len());
        log::debug!(
            "Bulk request done: {} succeeded, {} failed",
            report.succeeded,
            report.failed
        );
        Ok(report)
    }

    async fn delete_matching(&self, pattern: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.endpoint(pattern))
            .query(&[("allow_no_indices", "true")])
            .send()
            .await?;
        let indexes: Value = ensure_success(response).await?.json().await?;

        let Some(indexes) = indexes.as_object() else {
            return Ok(());
        };
        for name in indexes.keys() {
            log::info!("Deleting index {}", name);
            let response = self.client.delete(self.endpoint(name)).send().await?;
            let result: Value = ensure_success(response).await?.json().await?;
            if result["acknowledged"].as_bool() != Some(true) {
                return Err(BackendError::NotAcknowledged(format!(
                    "deletion of index {}",
                    name
                )));
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
