//! exectime-core: execution and reporting engine for exectime.
//!
//! An [`Executor`] runs a sequence of zero-argument operations one after
//! another, times each one, and hands a formatted line per operation to a
//! [`Sink`]. A failing (or panicking) operation is reported and skipped;
//! it never stops the rest of the batch.

pub mod clock;
pub mod engine;
pub mod error;
pub mod format;
pub mod models;
pub mod operation;
pub mod sink;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::Executor;
pub use error::ExecError;
pub use format::{format_error, format_record, format_time, format_total};
pub use models::{ExecutionConfig, ExecutionRecord, LogLevel, TimeFormat};
pub use operation::{Operation, OperationKind};
pub use sink::{Sink, StdoutSink, TracingSink, WriterSink};
