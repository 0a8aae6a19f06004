//! Observable state for the voter-information page: the selected map point,
//! the resolved precinct, the fetched voting locations, and the views the
//! page renders from them.
//!
//! [`LocationStore`] is the plain state with its mutators and derived views.
//! [`StoreHandle`] runs one store inside a task that owns it, takes
//! mutations as messages, and publishes a snapshot after every change.

pub mod error;
pub mod handle;
pub mod source;
pub mod state;

pub use error::StoreError;
pub use handle::{SelectionOutcome, StoreHandle};
pub use source::{AirtableSource, LocationSource};
pub use state::{LocationCounts, LocationStore, LocationsCollection, StoreConfig};
