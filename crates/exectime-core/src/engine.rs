//! Execution engine: the heart of exectime.
//!
//! [`Executor`] runs operations strictly one after another, reads the clock
//! around each one, and sends one formatted line per operation to its sink.
//! Failures are contained here: a returned `Err`, a panic, or an absent
//! operation becomes an `[Error message: ...]` line and the batch goes on.
//!
//! An executor is meant for one thread at a time. Sharing one across
//! threads would need external serialization, because batches mutate the
//! same configuration and running total.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, debug_span, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::format::{format_error, format_record, format_total};
use crate::models::{ExecutionConfig, ExecutionRecord, LogLevel, TimeFormat};
use crate::operation::{render, Operation};
use crate::sink::{Sink, StdoutSink};

const NULL_OPERATION: &str = "Null operation";

/// Runs batches of operations and reports their timing.
///
/// The configuration belongs to the executor and persists across batches
/// until changed or reset. The running total is reset at the start of
/// every [`run_all`](Executor::run_all).
pub struct Executor<S: Sink = StdoutSink, C: Clock = SystemClock> {
    config: ExecutionConfig,
    sink: S,
    clock: C,
    total_ms: u64,
}

impl Executor {
    /// Executor writing to stdout with wall-clock timing.
    pub fn new(config: ExecutionConfig) -> Self {
        Self::with_parts(config, StdoutSink, SystemClock)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(ExecutionConfig::default())
    }
}

impl<S: Sink> Executor<S> {
    pub fn with_sink(config: ExecutionConfig, sink: S) -> Self {
        Self::with_parts(config, sink, SystemClock)
    }
}

impl<S: Sink, C: Clock> Executor<S, C> {
    pub fn with_parts(config: ExecutionConfig, sink: S, clock: C) -> Self {
        debug!(?config, "Executor initialized");
        Self {
            config,
            sink,
            clock,
            total_ms: 0,
        }
    }

    // ─── Configuration ───────────────────────────────────────────────────────

    pub fn log_return(&mut self, log_return: bool) -> &mut Self {
        self.config.log_return = log_return;
        self
    }

    pub fn log_time(&mut self, log_time: bool) -> &mut Self {
        self.config.log_time = log_time;
        self
    }

    pub fn log_total_time(&mut self, log_total_time: bool) -> &mut Self {
        self.config.log_total_time = log_total_time;
        self
    }

    pub fn time_format(&mut self, time_format: TimeFormat) -> &mut Self {
        self.config.time_format = time_format;
        self
    }

    pub fn log_level(&mut self, log_level: LogLevel) -> &mut Self {
        self.config.log_level = log_level;
        self
    }

    /// Restore every toggle to its default.
    pub fn reset_config(&mut self) -> &mut Self {
        self.config = ExecutionConfig::default();
        self
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Milliseconds accumulated by successful operations since the last
    /// batch started. Only grows while `log_total_time` is enabled.
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // ─── Execution ───────────────────────────────────────────────────────────

    /// Run a batch in order.
    ///
    /// Items may be plain [`Operation`]s or `Option<Operation>`, where `None`
    /// stands for an absent operation. Emits one line per item, then the
    /// total line when `log_total_time` is enabled. Nothing is returned;
    /// all outcomes are reported through the sink.
    pub fn run_all<'a, I>(&mut self, operations: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<Operation<'a>>>,
    {
        self.total_ms = 0;

        let mut count = 0usize;
        let mut failures = 0usize;
        for (index, operation) in operations.into_iter().enumerate() {
            count += 1;
            let _span = debug_span!("operation", index).entered();
            if self.execute(operation.into()).is_none() {
                failures += 1;
            }
        }

        if self.config.log_total_time {
            let line = format_total(self.total_ms, self.config.time_format);
            self.emit(&line);
        }

        info!(
            operations = count,
            failures,
            total_ms = self.total_ms,
            "Batch finished"
        );
    }

    /// Run operations held in a map.
    ///
    /// Keys are discarded. Execution order is the map's iteration order,
    /// which is unspecified and may differ between runs; use
    /// [`run_all`](Executor::run_all) with a `Vec` when order matters.
    pub fn run_unordered<'a, K, H>(&mut self, operations: HashMap<K, Operation<'a>, H>) {
        self.run_all(operations.into_values());
    }

    /// Run a single operation and return its elapsed time.
    ///
    /// Returns [`Duration::ZERO`] when the operation is absent or fails.
    /// The running total is not reset, so callers may aggregate several
    /// calls themselves.
    pub fn run_one<'a>(&mut self, operation: impl Into<Option<Operation<'a>>>) -> Duration {
        self.execute(operation.into())
            .map_or(Duration::ZERO, Duration::from_millis)
    }

    /// Returns the elapsed milliseconds of a successful operation.
    fn execute(&mut self, operation: Option<Operation<'_>>) -> Option<u64> {
        let Some(operation) = operation else {
            warn!("Skipping absent operation");
            self.emit(&format_error(NULL_OPERATION));
            return None;
        };

        let kind = operation.kind();
        let start_ms = self.clock.now_ms();
        let outcome = operation.invoke();
        // The wall clock may step backwards; never report end before start.
        let end_ms = self.clock.now_ms().max(start_ms);

        // Rendering is outside the timed span but still fails the operation.
        let log_return = self.config.log_return;
        let outcome = outcome.and_then(|produced| match produced {
            Some(value) if log_return => render(value.as_ref()).map(Some),
            _ => Ok(None),
        });

        match outcome {
            Ok(value) => {
                let record = ExecutionRecord::success(start_ms, end_ms, value);
                let elapsed_ms = record.elapsed_ms();
                debug!(?kind, elapsed_ms, "Operation completed");

                if self.config.log_time {
                    let line = format_record(&record, &self.config);
                    self.emit(&line);
                }
                if self.config.log_total_time {
                    self.total_ms = self.total_ms.saturating_add(elapsed_ms);
                }
                Some(elapsed_ms)
            }
            Err(message) => {
                warn!(?kind, error = %message, "Operation failed");
                let record = ExecutionRecord::failure(start_ms, end_ms, message);
                let line = format_record(&record, &self.config);
                self.emit(&line);
                None
            }
        }
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = self.sink.emit(line) {
            error!("Failed to write to sink: {}", e);
        }
    }
}
