//! The generation run
//!
//! A run pulls records from a [`ParameterSource`] one by one, gives every record
//! to the first [`QueryHandler`] that owns its query identifier, and writes every
//! valid result to a [`QueryResultDestination`] under a counter that starts at 0.
//!
//! # Dispatch
//!
//! - [`DispatchMode::Sequential`] handles one record at a time, so written
//!   indices follow input order.
//! - [`DispatchMode::Concurrent`] keeps every handling task in a task group that
//!   interleaves them on the current task. Indices are taken when a task reaches
//!   its write, so they follow completion order.
//!
//! In both modes the first failure fails the run. Tasks already in flight are
//! not cancelled; they settle before the run returns.

use crate::core::ParameterRecord;
use crate::destination::QueryResultDestination;
use crate::error::{Error, Result};
use crate::handlers::QueryHandler;
use crate::sources::{ParameterSource, RecordStream};
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};

/// How records are scheduled onto handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    #[default]
    Sequential,
    Concurrent,
}

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationSummary {
    /// Records read from the source
    pub records: usize,
    /// Query-results pairs written to the destination
    pub written: usize,
    /// Records claimed by a handler that produces no output
    pub skipped: usize,
    /// Records no handler claimed
    pub unmatched: usize,
}

impl GenerationSummary {
    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Written => self.written += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Unmatched => self.unmatched += 1,
        }
    }
}

enum Outcome {
    Written,
    Skipped,
    Unmatched,
}

/// Main entrypoint for handling validation parameters.
pub struct ValidationGenerator {
    parameter_source: Box<dyn ParameterSource>,
    destination: Box<dyn QueryResultDestination>,
    query_handlers: Vec<QueryHandler>,
    dispatch: DispatchMode,
}

impl ValidationGenerator {
    pub fn new(
        parameter_source: Box<dyn ParameterSource>,
        destination: Box<dyn QueryResultDestination>,
        query_handlers: Vec<QueryHandler>,
    ) -> Self {
        ValidationGenerator {
            parameter_source,
            destination,
            query_handlers,
            dispatch: DispatchMode::default(),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn dispatch(&self) -> DispatchMode {
        self.dispatch
    }

    pub fn query_handlers(&self) -> &[QueryHandler] {
        &self.query_handlers
    }

    /// Runs the generator over all records of the parameter source.
    pub async fn generate(&self) -> Result<GenerationSummary> {
        let records = self.parameter_source.parameters().await?;
        info!(
            handlers = self.query_handlers.len(),
            dispatch = ?self.dispatch,
            "generating validation queries"
        );

        let next_index = AtomicUsize::new(0);
        let summary = match self.dispatch {
            DispatchMode::Sequential => self.run_sequential(records, &next_index).await?,
            DispatchMode::Concurrent => self.run_concurrent(records, &next_index).await?,
        };

        info!(
            records = summary.records,
            written = summary.written,
            skipped = summary.skipped,
            unmatched = summary.unmatched,
            "generation finished"
        );
        Ok(summary)
    }

    async fn run_sequential(
        &self,
        mut records: RecordStream,
        next_index: &AtomicUsize,
    ) -> Result<GenerationSummary> {
        let mut summary = GenerationSummary::default();
        while let Some(record) = records.next().await {
            summary.records += 1;
            let outcome = self.handle_record(record?, next_index).await?;
            summary.count(outcome);
        }
        Ok(summary)
    }

    async fn run_concurrent(
        &self,
        mut records: RecordStream,
        next_index: &AtomicUsize,
    ) -> Result<GenerationSummary> {
        let mut summary = GenerationSummary::default();
        let mut tasks: FuturesUnordered<BoxFuture<'_, Result<Outcome>>> = FuturesUnordered::new();
        let mut first_error: Option<Error> = None;
        let mut input_done = false;

        loop {
            if input_done && tasks.is_empty() {
                break;
            }
            tokio::select! {
                biased;

                Some(result) = tasks.next(), if !tasks.is_empty() => match result {
                    Ok(outcome) => summary.count(outcome),
                    Err(e) => {
                        // No new records once the run has failed; running tasks still settle.
                        input_done = true;
                        record_failure(&mut first_error, e);
                    }
                },
                item = records.next(), if !input_done => match item {
                    Some(Ok(record)) => {
                        summary.records += 1;
                        tasks.push(self.handle_record(record, next_index).boxed());
                    }
                    Some(Err(e)) => {
                        input_done = true;
                        record_failure(&mut first_error, e);
                    }
                    None => input_done = true,
                },
                else => break,
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    async fn handle_record(
        &self,
        record: ParameterRecord,
        next_index: &AtomicUsize,
    ) -> Result<Outcome> {
        for handler in &self.query_handlers {
            let Some(handled) = handler.handle(&record).await? else {
                continue;
            };

            if !handled.valid {
                debug!(query_identifier = %record.query_identifier, "skipping void query");
                return Ok(Outcome::Skipped);
            }

            let index = next_index.fetch_add(1, Ordering::Relaxed);
            self.destination.write(index, &handled.query, &handled.results).await?;
            return Ok(Outcome::Written);
        }

        warn!(
            query_identifier = %record.query_identifier,
            "Could not find a query handler for {}", record.query_identifier
        );
        Ok(Outcome::Unmatched)
    }
}

/// Keeps the first failure; later ones are only logged.
fn record_failure(first_error: &mut Option<Error>, e: Error) {
    if first_error.is_none() {
        error!(error = %e, "generation failed, waiting for running tasks");
        *first_error = Some(e);
    } else {
        debug!(error = %e, "additional failure after the first one");
    }
}
