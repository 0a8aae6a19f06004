//! Single-owner task around a [`LocationStore`].
//!
//! The task is the only writer. Mutations arrive over an `mpsc` channel and
//! every change is published through a `watch` channel, so readers always
//! see a whole snapshot.
//!
//! `select_precinct` spawns the fetch as its own task. Starting a new
//! selection aborts the one in flight, and every fetch is tagged with a
//! generation so a late completion from an aborted fetch is dropped instead
//! of overwriting the newer selection.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use pollfinder_core::{FetchStatus, LocationRecord, Point, Precinct};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::source::LocationSource;
use crate::state::{LocationStore, StoreConfig};

/// How a `select_precinct` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Locations were fetched and stored.
    Loaded { count: usize },
    /// No precinct was given; the store was reset.
    Cleared,
    /// The fetch failed; status is `Error` and the previous data was kept.
    Failed(String),
    /// A later selection replaced this one before it finished.
    Superseded,
}

enum Command {
    SetSelectedPoint(Option<Point>),
    SetPrecinct(Option<Precinct>),
    SetPrecinctError(Option<String>),
    SetLocationsFetchStatus(FetchStatus),
    SetLocationsData(Vec<LocationRecord>),
    SetSelectedLocationType(String),
    SelectPrecinct {
        precinct: Option<Precinct>,
        reply: oneshot::Sender<SelectionOutcome>,
    },
}

/// Reported as the fetch error when the source panics mid-fetch.
const SOURCE_PANICKED: &str = "location source panicked";

struct FetchDone {
    generation: u64,
    precinct: Precinct,
    result: Result<Vec<LocationRecord>, String>,
}

struct InFlight {
    generation: u64,
    task: JoinHandle<()>,
    reply: oneshot::Sender<SelectionOutcome>,
}

/// Cloneable handle to a store running in its own task.
///
/// The task stops once every handle has been dropped.
#[derive(Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<LocationStore>,
}

impl StoreHandle {
    /// Spawns the owner task on the current tokio runtime.
    pub fn spawn<S: LocationSource>(source: S, config: StoreConfig) -> Self {
        let store = LocationStore::new(config);
        let (snapshot_tx, snapshot_rx) = watch::channel(store.clone());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let owner = StoreOwner {
            store,
            source: Arc::new(source),
            snapshots: snapshot_tx,
            done_tx,
            generation: 0,
            in_flight: None,
        };
        tokio::spawn(owner.run(command_rx, done_rx));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> LocationStore {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LocationStore> {
        self.snapshots.clone()
    }

    /// Selects `precinct` and waits for its locations, or resets the store
    /// when `precinct` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub async fn select_precinct(
        &self,
        precinct: Option<Precinct>,
    ) -> Result<SelectionOutcome, StoreError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::SelectPrecinct { precinct, reply })?;
        outcome.await.map_err(|_| StoreError::Closed)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub fn set_selected_point(&self, point: Option<Point>) -> Result<(), StoreError> {
        self.send(Command::SetSelectedPoint(point))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub fn set_precinct(&self, precinct: Option<Precinct>) -> Result<(), StoreError> {
        self.send(Command::SetPrecinct(precinct))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub fn set_precinct_error(&self, error: Option<String>) -> Result<(), StoreError> {
        self.send(Command::SetPrecinctError(error))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub fn set_locations_fetch_status(&self, status: FetchStatus) -> Result<(), StoreError> {
        self.send(Command::SetLocationsFetchStatus(status))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub fn set_locations_data(&self, data: Vec<LocationRecord>) -> Result<(), StoreError> {
        self.send(Command::SetLocationsData(data))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the owner task has stopped.
    pub fn set_selected_location_type(&self, key: impl Into<String>) -> Result<(), StoreError> {
        self.send(Command::SetSelectedLocationType(key.into()))
    }

    fn send(&self, command: Command) -> Result<(), StoreError> {
        self.commands.send(command).map_err(|_| StoreError::Closed)
    }
}

struct StoreOwner<S> {
    store: LocationStore,
    source: Arc<S>,
    snapshots: watch::Sender<LocationStore>,
    done_tx: mpsc::UnboundedSender<FetchDone>,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl<S: LocationSource> StoreOwner<S> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut done: mpsc::UnboundedReceiver<FetchDone>,
    ) {
        loop {
            tokio::select! {
                // Commands first: a queued selection bumps the generation
                // before any completion it supersedes is looked at.
                biased;

                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(finished) = done.recv() => self.finish(finished),
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
        tracing::debug!("location store task stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SetSelectedPoint(point) => self.store.set_selected_point(point),
            Command::SetPrecinct(precinct) => self.store.set_precinct(precinct),
            Command::SetPrecinctError(error) => self.store.set_precinct_error(error),
            Command::SetLocationsFetchStatus(status) => {
                self.store.set_locations_fetch_status(status);
            }
            Command::SetLocationsData(data) => self.store.set_locations_data(data),
            Command::SetSelectedLocationType(key) => self.store.set_selected_location_type(key),
            Command::SelectPrecinct { precinct, reply } => {
                self.select_precinct(precinct, reply);
                return;
            }
        }
        self.publish();
    }

    fn select_precinct(
        &mut self,
        precinct: Option<Precinct>,
        reply: oneshot::Sender<SelectionOutcome>,
    ) {
        self.cancel_in_flight();
        self.generation += 1;

        let Some(precinct) = precinct else {
            self.store.set_locations_fetch_status(FetchStatus::Unset);
            self.store.set_locations_data(Vec::new());
            self.store.set_precinct(None);
            self.store.set_fetched_at(None);
            self.publish();
            let _ = reply.send(SelectionOutcome::Cleared);
            return;
        };

        tracing::debug!(
            generation = self.generation,
            county = %precinct.county,
            precinct = %precinct.precinct_id,
            "fetching precinct locations"
        );
        self.store.set_precinct_error(None);
        self.store.set_locations_fetch_status(FetchStatus::Loading);
        self.publish();

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let done_tx = self.done_tx.clone();
        let task = tokio::spawn(async move {
            let fetch = AssertUnwindSafe(source.fetch_locations(&precinct)).catch_unwind();
            let result = match fetch.await {
                Ok(fetched) => fetched.map_err(|e| e.to_string()),
                Err(_) => Err(SOURCE_PANICKED.to_owned()),
            };
            // The owner only goes away at shutdown, when nobody is waiting.
            let _ = done_tx.send(FetchDone {
                generation,
                precinct,
                result,
            });
        });

        self.in_flight = Some(InFlight {
            generation,
            task,
            reply,
        });
    }

    fn finish(&mut self, done: FetchDone) {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == done.generation);
        if !current {
            tracing::debug!(
                generation = done.generation,
                latest = self.generation,
                "dropping result of superseded precinct fetch"
            );
            return;
        }
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        let outcome = match done.result {
            Ok(records) => {
                let count = records.len();
                self.store.set_locations_fetch_status(FetchStatus::Success);
                self.store.set_locations_data(records);
                self.store.set_precinct(Some(done.precinct));
                self.store.set_fetched_at(Some(Utc::now()));
                SelectionOutcome::Loaded { count }
            }
            Err(message) => {
                tracing::warn!(
                    county = %done.precinct.county,
                    precinct = %done.precinct.precinct_id,
                    error = %message,
                    "precinct location fetch failed"
                );
                self.store.set_locations_fetch_status(FetchStatus::Error);
                self.store.set_precinct_error(Some(message.clone()));
                SelectionOutcome::Failed(message)
            }
        };
        self.publish();
        let _ = in_flight.reply.send(outcome);
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(
                generation = in_flight.generation,
                "cancelling in-flight precinct fetch"
            );
            in_flight.task.abort();
            let _ = in_flight.reply.send(SelectionOutcome::Superseded);
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.store.clone());
    }
}
