pub mod client;
pub mod error;
pub mod formula;
pub mod types;

mod retry;

pub use client::{AirtableClient, FetchOptions};
pub use error::AirtableError;
pub use formula::precinct_filter;
pub use types::RecordsPage;
