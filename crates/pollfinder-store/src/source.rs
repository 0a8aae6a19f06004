//! Where location records come from.

use std::future::Future;

use pollfinder_airtable::{AirtableClient, AirtableError, FetchOptions};
use pollfinder_core::{AppConfig, LocationRecord, Precinct};

/// Fetches every location record serving a precinct.
///
/// The store runs each fetch in its own task, so implementations must be
/// shareable across tasks and return `Send` futures.
pub trait LocationSource: Send + Sync + 'static {
    type Error: std::error::Error + Send + 'static;

    fn fetch_locations(
        &self,
        precinct: &Precinct,
    ) -> impl Future<Output = Result<Vec<LocationRecord>, Self::Error>> + Send;
}

/// [`LocationSource`] backed by the Airtable locations table.
pub struct AirtableSource {
    client: AirtableClient,
    options: FetchOptions,
}

impl AirtableSource {
    #[must_use]
    pub fn new(client: AirtableClient, options: FetchOptions) -> Self {
        Self { client, options }
    }

    /// # Errors
    ///
    /// Returns [`AirtableError`] if the client cannot be built from `config`.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AirtableError> {
        Ok(Self::new(
            AirtableClient::from_app_config(config)?,
            FetchOptions::from_app_config(config),
        ))
    }
}

impl LocationSource for AirtableSource {
    type Error = AirtableError;

    async fn fetch_locations(
        &self,
        precinct: &Precinct,
    ) -> Result<Vec<LocationRecord>, AirtableError> {
        self.client
            .fetch_precinct_locations(precinct, &self.options)
            .await
    }
}
