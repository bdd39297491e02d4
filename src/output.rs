//! Output sinks.
//!
//! Result lines and diagnostics go to separate streams. The console
//! reporter writes results to stdout and diagnostics to stderr.

use crate::pipeline::ScanConfig;
use console::style;
use std::io::{self, Write};
use std::sync::Mutex;

/// Destination for scan output.
///
/// Shared between the range expander (diagnostics) and the coordinator
/// (result lines), so implementations must be thread safe.
pub trait Reporter: Send + Sync {
    /// Emit one result line.
    fn result_line(&self, line: &str);

    /// Emit one diagnostic line on the diagnostic stream.
    fn diagnostic(&self, message: &str);
}

/// Reporter writing to the process's stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn result_line(&self, line: &str) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // A closed pipe (e.g. `| head`) is not worth aborting the scan over.
        let _ = writeln!(out, "{}", line);
    }

    fn diagnostic(&self, message: &str) {
        eprintln!("{}", styled_diagnostic(message));
    }
}

/// Diagnostic line as written to stderr. Colour follows stderr's terminal
/// state, so a redirected stderr gets the plain text.
fn styled_diagnostic(message: &str) -> String {
    style(message).yellow().for_stderr().to_string()
}

/// Reporter that keeps everything in memory.
#[derive(Debug, Default)]
pub struct BufferReporter {
    lines: Mutex<Vec<String>>,
    diagnostics: Mutex<Vec<String>>,
}

impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result lines received so far, in arrival order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Diagnostics received so far, in arrival order.
    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl Reporter for BufferReporter {
    fn result_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    fn diagnostic(&self, message: &str) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(message.to_string());
        }
    }
}

/// One-line summary of the effective configuration, printed before scanning.
pub fn scan_header(config: &ScanConfig) -> String {
    format!(
        "Scanning {} ports [{}] timeout {:?} threads {}",
        config.host,
        config.ports.join(" "),
        config.timeout,
        config.threads
    )
}

/// Print the scan header to stdout.
pub fn print_scan_header(config: &ScanConfig) {
    println!("{}", scan_header(config));
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold().for_stderr(), msg);
}
