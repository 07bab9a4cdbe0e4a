//! The log sink. The probe's observable result is its trace: one
//! human-readable line per step, streamed to a Reporter.

use crate::probe::ProbeOutcome;
use serde::Serialize;

/// Where probe log lines go.
pub trait Reporter {
    fn line(&mut self, message: &str);
}

/// Prints each line as it happens.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn line(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Collects lines for later inspection (tests, JSON output).
#[derive(Debug, Default)]
pub struct TraceBuffer {
    lines: Vec<String>,
}

impl TraceBuffer {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Reporter for TraceBuffer {
    fn line(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}

/// A finished run: the terminal outcome plus the full trace.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    pub trace: Vec<String>,
}
