//! Operator-facing log lines.
//!
//! `SpecLogger` is constructed by the caller and handed to the batch driver.
//! The console sink forwards to `tracing`; `MemorySink` keeps the lines for
//! inspection.

use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
    Success,
}

pub trait LogSink {
    fn emit(&self, level: Level, message: &str);
}

/// Renders through the installed `tracing` subscriber.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{}", message),
            Level::Error => tracing::error!("✖ {}", message),
            Level::Success => tracing::info!(status = "success", "✔ {}", message),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: Level) -> usize {
        self.records().iter().filter(|(l, _)| *l == level).count()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}

pub struct SpecLogger {
    sink: Box<dyn LogSink>,
}

impl SpecLogger {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn console() -> Self {
        Self::new(TracingSink)
    }

    pub fn log(&self, message: &str, level: Level) {
        self.sink.emit(level, message);
    }

    pub fn info(&self, message: &str) {
        self.log(message, Level::Info);
    }

    pub fn error(&self, message: &str) {
        self.log(message, Level::Error);
    }

    pub fn success(&self, message: &str) {
        self.log(message, Level::Success);
    }
}

pub fn init_cli_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spec_compiler=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
