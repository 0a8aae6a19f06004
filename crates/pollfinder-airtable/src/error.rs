use thiserror::Error;

/// Errors returned by the Airtable locations client.
#[derive(Debug, Error)]
pub enum AirtableError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429; Airtable asks clients to wait before the next request.
    #[error("rate limited by Airtable (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-2xx response, with the error envelope Airtable sent.
    #[error("Airtable API error {status} ({error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("pagination limit reached for {table}: exceeded {max_pages} pages")]
    PaginationLimit { table: String, max_pages: usize },

    #[error("invalid Airtable URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
