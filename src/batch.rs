//! Batch execution: one gateway call per target path, in order.
//!
//! Recoverable failures become [`OperationOutcome::ProviderFailure`] entries
//! and the batch moves on. A fatal failure stops the batch before the next
//! path and is returned as [`BatchAborted`], carrying the outcomes gathered
//! so far.

use crate::error::{FatalError, GatewayError};
use crate::namespace::PropertyGateway;
use crate::types::{ExecutionContext, OperationOutcome, PropertyRequest};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Receives each outcome as soon as its path finishes.
pub trait OutcomeSink {
    fn record(&mut self, outcome: &OperationOutcome);
}

impl<F> OutcomeSink for F
where
    F: FnMut(&OperationOutcome),
{
    fn record(&mut self, outcome: &OperationOutcome) {
        (*self)(outcome)
    }
}

/// Ordered outcomes of one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<OperationOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Process exit code: non-zero when any path failed.
    pub fn exit_code(&self) -> i32 {
        if self.failed() == 0 {
            0
        } else {
            1
        }
    }
}

/// A fatal gateway failure ended the batch early.
#[derive(Debug, Error)]
#[error("Aborted at '{path}' after {attempted} of {total} path(s): {source}")]
pub struct BatchAborted {
    pub path: String,
    pub attempted: usize,
    pub total: usize,
    #[source]
    pub source: FatalError,
    pub report: BatchReport,
}

/// Drives a [`PropertyGateway`] over every target path of a request.
pub struct BatchExecutor<'a, G: PropertyGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: PropertyGateway + ?Sized> BatchExecutor<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Run the batch, collecting outcomes only.
    pub fn run(
        &self,
        request: &PropertyRequest,
        ctx: &ExecutionContext,
    ) -> Result<BatchReport, BatchAborted> {
        self.execute(request, ctx, &mut |_: &OperationOutcome| {})
    }

    /// Run the batch, streaming each outcome to `sink` as it happens.
    pub fn execute(
        &self,
        request: &PropertyRequest,
        ctx: &ExecutionContext,
        sink: &mut dyn OutcomeSink,
    ) -> Result<BatchReport, BatchAborted> {
        let total = request.target_paths().len();
        let mut report = BatchReport {
            outcomes: Vec::with_capacity(total),
        };

        for (index, path) in request.target_paths().iter().enumerate() {
            debug!(
                path = %path,
                index,
                total,
                property = request.property_name(),
                "Creating property"
            );
            let result = self.gateway.create_property(
                path,
                request.property_name(),
                request.property_type.as_deref(),
                request.property_value.as_ref(),
                ctx,
            );

            let outcome = match result {
                Ok(created) => OperationOutcome::Success {
                    path: path.clone(),
                    created,
                },
                Err(GatewayError::Recoverable(failure)) => {
                    warn!(
                        path = %path,
                        error_id = failure.kind().error_id(),
                        "{}",
                        failure
                    );
                    OperationOutcome::ProviderFailure {
                        path: path.clone(),
                        failure,
                    }
                }
                Err(GatewayError::Fatal(source)) => {
                    error!(path = %path, attempted = index + 1, total, "{}", source);
                    return Err(BatchAborted {
                        path: path.clone(),
                        attempted: index + 1,
                        total,
                        source,
                        report,
                    });
                }
            };

            sink.record(&outcome);
            report.outcomes.push(outcome);
        }

        debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        Ok(report)
    }
}
