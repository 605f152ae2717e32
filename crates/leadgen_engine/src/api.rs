use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use url::Url;

use leadgen_core::SearchSummary;

use crate::{ApiError, ApiFailure, JobSnapshot, SearchAccepted};

/// Connection settings for the backend service. The base URL is the one
/// recognized configuration option; it is injected here instead of read
/// from process-global state.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    /// Validates the base URL and normalizes it to a trailing slash so
    /// endpoint paths join underneath it.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut normalized = base_url.trim().to_owned();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|err| ApiError::new(ApiFailure::InvalidBaseUrl, err.to_string()))?;
        Ok(Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        })
    }
}

#[async_trait::async_trait]
pub trait LeadApi: Send + Sync {
    async fn list_searches(&self) -> Result<Vec<SearchSummary>, ApiError>;
    async fn submit_search(&self, industry: &str, region: &str)
        -> Result<SearchAccepted, ApiError>;
    async fn fetch_results(&self, job_id: &str) -> Result<JobSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestLeadApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl ReqwestLeadApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiError::new(ApiFailure::InvalidBaseUrl, err.to_string()))
    }

    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl LeadApi for ReqwestLeadApi {
    async fn list_searches(&self) -> Result<Vec<SearchSummary>, ApiError> {
        let payload = self.get_json(self.endpoint("api/searches")?).await?;
        let entries = payload
            .as_array()
            .ok_or_else(|| ApiError::new(ApiFailure::MalformedBody, "expected an array"))?;
        Ok(entries.iter().filter_map(search_summary).collect())
    }

    async fn submit_search(
        &self,
        industry: &str,
        region: &str,
    ) -> Result<SearchAccepted, ApiError> {
        let body = json!({ "industry": industry, "region": region });
        let response = self
            .client
            .post(self.endpoint("api/search")?)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let payload = read_json(response).await?;

        let job_id = payload
            .get("jobId")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::new(ApiFailure::MalformedBody, "missing jobId"))?
            .to_owned();
        Ok(SearchAccepted {
            job_id,
            raw: record_array(&payload, "raw"),
        })
    }

    async fn fetch_results(&self, job_id: &str) -> Result<JobSnapshot, ApiError> {
        let payload = self
            .get_json(self.endpoint(&format!("api/results/{job_id}"))?)
            .await?;
        // Either collection may be absent from the payload; absent reads
        // the same as empty.
        Ok(JobSnapshot {
            raw: record_array(&payload, "raw"),
            results: record_array(&payload, "results"),
        })
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            ApiFailure::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ApiError::new(ApiFailure::MalformedBody, err.to_string()))
}

fn record_array(payload: &Value, key: &str) -> Vec<Value> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn search_summary(entry: &Value) -> Option<SearchSummary> {
    let field = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    // Entries without an id cannot be resumed and are dropped.
    let id = entry.get("_id").and_then(Value::as_str)?.to_owned();
    Some(SearchSummary {
        id,
        industry: field("industry"),
        region: field("region"),
        status: field("status"),
        created_at: field("createdAt"),
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    ApiError::new(ApiFailure::Network, err.to_string())
}
