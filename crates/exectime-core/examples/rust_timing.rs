//! Example of timing a batch of closures with exectime-core.

use std::thread;
use std::time::Duration;

use exectime_core::{ExecutionConfig, Executor, LogLevel, Operation, TimeFormat};
use tracing_subscriber::EnvFilter;

fn fib(n: u64) -> u64 {
    if n < 2 {
        n
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

fn main() {
    // Diagnostics (failed operations, batch summaries) go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 1. Setup configuration
    let config = ExecutionConfig::new()
        .with_log_return(true)
        .with_log_total_time(true);

    // 2. Build an executor writing to stdout
    let mut executor = Executor::new(config);

    // 3. Run a batch: values, side effects, a failure and an absent slot
    executor.run_all(vec![
        Some(Operation::value(|| fib(25))),
        Some(Operation::effect(|| thread::sleep(Duration::from_millis(20)))),
        Some(Operation::try_value(|| "forty-two".parse::<i32>())),
        None,
        Some(Operation::value(|| "done")),
    ]);

    // 4. Configuration persists; switch to verbose output for the next batch
    executor
        .log_level(LogLevel::Max)
        .time_format(TimeFormat::Nanoseconds);
    let elapsed = executor.run_one(Operation::effect(|| thread::sleep(Duration::from_millis(5))));
    println!("single operation took {:?}", elapsed);
}
