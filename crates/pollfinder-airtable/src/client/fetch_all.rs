//! Multi-page location fetch for `AirtableClient`.

use pollfinder_core::{AppConfig, LocationRecord, Precinct};

use crate::error::AirtableError;
use crate::formula::precinct_filter;

use super::AirtableClient;

/// How a precinct's locations are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Follow `offset` tokens until the last page. When off, only the first
    /// page is read and anything past Airtable's 100-record cap is dropped.
    pub paginate: bool,
    /// Ask for `Tribal Land` rows first. Only useful without pagination, to
    /// keep those rows inside the first page.
    pub sort_by_tribal_land: bool,
    /// Guard against cycling offsets.
    pub max_pages: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            paginate: true,
            sort_by_tribal_land: false,
            max_pages: 100,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            paginate: config.paginate,
            sort_by_tribal_land: config.sort_by_tribal_land,
            max_pages: config.max_pages,
        }
    }
}

impl AirtableClient {
    /// Fetches every active, geocoded location serving `precinct`.
    ///
    /// Pages are requested strictly one after another, each carrying the
    /// previous page's `offset`, and appended in arrival order.
    ///
    /// **All-or-nothing semantics**: if any page fails, records from earlier
    /// pages are discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`].
    /// Returns [`AirtableError::PaginationLimit`] if more than
    /// `options.max_pages` pages would be needed.
    pub async fn fetch_precinct_locations(
        &self,
        precinct: &Precinct,
        options: &FetchOptions,
    ) -> Result<Vec<LocationRecord>, AirtableError> {
        let formula = precinct_filter(precinct);
        let mut records: Vec<LocationRecord> = Vec::new();
        let mut offset: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > options.max_pages {
                return Err(AirtableError::PaginationLimit {
                    table: self.table.clone(),
                    max_pages: options.max_pages,
                });
            }

            let page = self
                .fetch_page(&formula, options.sort_by_tribal_land, offset.as_deref())
                .await?;
            tracing::debug!(
                table = %self.table,
                county = %precinct.county,
                precinct = %precinct.precinct_id,
                page = page_count,
                records = page.records.len(),
                has_more = page.offset.is_some(),
                "fetched locations page"
            );

            records.extend(page.records);
            offset = page.offset;

            if !options.paginate {
                if offset.is_some() {
                    tracing::warn!(
                        table = %self.table,
                        county = %precinct.county,
                        precinct = %precinct.precinct_id,
                        kept = records.len(),
                        "pagination disabled; dropping records past the first page"
                    );
                }
                break;
            }
            if offset.is_none() {
                break;
            }
        }

        tracing::info!(
            table = %self.table,
            county = %precinct.county,
            precinct = %precinct.precinct_id,
            pages = page_count,
            records = records.len(),
            "fetched precinct locations"
        );
        Ok(records)
    }
}
