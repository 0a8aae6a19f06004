//! HTTP client for the Airtable list-records endpoint of the locations table.
//!
//! Wraps `reqwest` with bearer-token auth, typed error envelopes, and retry on
//! transient failures. Multi-page fetches live in `fetch_all`.

mod fetch_all;

use std::time::Duration;

use pollfinder_core::config::DEFAULT_AIRTABLE_API_URL;
use pollfinder_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::AirtableError;
use crate::retry::RetryPolicy;
use crate::types::{ErrorEnvelope, RecordsPage};

pub use fetch_all::FetchOptions;

/// Field the optional sort hint orders by, descending, so tribal-land
/// locations land on the first page.
pub const SORT_FIELD: &str = "Tribal Land";

/// Airtable asks for a 30 second pause after a 429.
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Client for one Airtable table.
///
/// Use [`AirtableClient::new`] for production or
/// [`AirtableClient::with_base_url`] to point at a mock server in tests.
pub struct AirtableClient {
    client: Client,
    token: String,
    table: String,
    table_url: Url,
    retry: RetryPolicy,
}

impl AirtableClient {
    /// Creates a client for `base_id`/`table` on the production API.
    ///
    /// # Errors
    ///
    /// Returns [`AirtableError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_id: &str,
        table: &str,
        token: &str,
        timeout_secs: u64,
    ) -> Result<Self, AirtableError> {
        Self::with_base_url(DEFAULT_AIRTABLE_API_URL, base_id, table, token, timeout_secs)
    }

    /// Creates a client with a custom API root (for testing with wiremock).
    ///
    /// Retries are off until [`AirtableClient::with_retry_policy`] is applied.
    ///
    /// # Errors
    ///
    /// Returns [`AirtableError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AirtableError::InvalidUrl`] if `api_url`
    /// is not an absolute http(s) URL.
    pub fn with_base_url(
        api_url: &str,
        base_id: &str,
        table: &str,
        token: &str,
        timeout_secs: u64,
    ) -> Result<Self, AirtableError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pollfinder/0.1 (voter-information)")
            .build()?;

        let table_url = Self::table_url(api_url, base_id, table)?;

        Ok(Self {
            client,
            token: token.to_owned(),
            table: table.to_owned(),
            table_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Builds a client from the loaded application config, retry policy included.
    ///
    /// # Errors
    ///
    /// Same as [`AirtableClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AirtableError> {
        Ok(Self::with_base_url(
            &config.airtable_api_url,
            &config.airtable_base_id,
            &config.locations_table,
            &config.airtable_token,
            config.request_timeout_secs,
        )?
        .with_retry_policy(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Sets how many extra attempts transient failures get, and the base
    /// back-off delay between them. A 429 waits at least its `Retry-After`.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy::new(max_retries, backoff_base_ms);
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetches one page of records matching `formula`, retrying transient errors.
    ///
    /// `offset` is the continuation token from the previous page; `None`
    /// requests the first page.
    ///
    /// # Errors
    ///
    /// - [`AirtableError::RateLimited`]: HTTP 429 after all retries.
    /// - [`AirtableError::Api`]: any other non-2xx status (5xx retried, 4xx not).
    /// - [`AirtableError::Http`]: network or TLS failure after all retries.
    /// - [`AirtableError::Deserialize`]: the body is not a records page.
    pub async fn fetch_page(
        &self,
        formula: &str,
        sort_by_tribal_land: bool,
        offset: Option<&str>,
    ) -> Result<RecordsPage, AirtableError> {
        let url = self.page_url(formula, sort_by_tribal_land, offset);

        self.retry.run(|| {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(&self.token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(AirtableError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(Self::api_error(status, &body));
                }

                let body = response.text().await?;
                serde_json::from_str::<RecordsPage>(&body).map_err(|e| {
                    AirtableError::Deserialize {
                        context: format!("records page from table {}", self.table),
                        source: e,
                    }
                })
            }
        })
        .await
    }

    /// Builds `{api_url}/{base_id}/{table}`, percent-encoding each segment.
    fn table_url(api_url: &str, base_id: &str, table: &str) -> Result<Url, AirtableError> {
        let invalid = |reason: String| AirtableError::InvalidUrl {
            url: api_url.to_owned(),
            reason,
        };

        let mut url = Url::parse(api_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .push(base_id)
            .push(table);
        Ok(url)
    }

    fn page_url(&self, formula: &str, sort_by_tribal_land: bool, offset: Option<&str>) -> Url {
        let mut url = self.table_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("filterByFormula", formula);
            if sort_by_tribal_land {
                pairs.append_pair("sort[0][field]", SORT_FIELD);
                pairs.append_pair("sort[0][direction]", "desc");
            }
            if let Some(token) = offset {
                pairs.append_pair("offset", token);
            }
        }
        url
    }

    /// Maps a non-2xx response to [`AirtableError::Api`], reading Airtable's
    /// error envelope when the body carries one.
    fn api_error(status: reqwest::StatusCode, body: &str) -> AirtableError {
        let (error_type, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.into_parts(),
            Err(_) => (
                status
                    .canonical_reason()
                    .unwrap_or("UNKNOWN")
                    .to_ascii_uppercase()
                    .replace(' ', "_"),
                body.chars().take(200).collect(),
            ),
        };
        AirtableError::Api {
            status: status.as_u16(),
            error_type,
            message,
        }
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
