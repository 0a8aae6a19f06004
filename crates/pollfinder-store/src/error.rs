use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The task owning the store has stopped.
    #[error("location store task has shut down")]
    Closed,
}
