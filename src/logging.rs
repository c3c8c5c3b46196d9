//! Leveled console logging for migration runs
//!
//! Components receive an `Arc<dyn MigrationLogger>` at construction instead of
//! reaching for a global. The console implementation prints the user-facing
//! progress lines and mirrors each one as a `tracing` event under the
//! `ado2gh::console` target, which JSON telemetry (see [`crate::telemetry`])
//! picks up.

use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Leveled logging contract used by transformers and orchestrators
pub trait MigrationLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn success(&self, message: &str);
    fn verbose(&self, message: &str);
}

/// Prints progress to the terminal
#[derive(Debug, Clone, Default)]
pub struct ConsoleLogger {
    verbose: bool,
}

impl ConsoleLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn shared(verbose: bool) -> Arc<dyn MigrationLogger> {
        Arc::new(Self::new(verbose))
    }
}

impl MigrationLogger for ConsoleLogger {
    fn info(&self, message: &str) {
        info!(target: "ado2gh::console", "{message}");
        println!("{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "ado2gh::console", "{message}");
        eprintln!("⚠️  {message}");
    }

    fn error(&self, message: &str) {
        error!(target: "ado2gh::console", "{message}");
        eprintln!("❌ {message}");
    }

    fn success(&self, message: &str) {
        info!(target: "ado2gh::console", outcome = "success", "{message}");
        println!("✅ {message}");
    }

    fn verbose(&self, message: &str) {
        debug!(target: "ado2gh::console", "{message}");
        if self.verbose {
            println!("   🔍 {message}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
    Verbose,
}

/// Records every message; used by tests to assert on log output
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// Count messages at `level` containing `needle`
    pub fn count_containing(&self, level: LogLevel, needle: &str) -> usize {
        self.messages(level)
            .iter()
            .filter(|message| message.contains(needle))
            .count()
    }
}

impl MigrationLogger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.push(LogLevel::Success, message);
    }

    fn verbose(&self, message: &str) {
        self.push(LogLevel::Verbose, message);
    }
}
