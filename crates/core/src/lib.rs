pub mod behavior;
pub mod dom;
pub mod page;
pub mod probe;
pub mod query;
pub mod report;
pub mod style;
#[cfg(feature = "fetch")]
pub mod fetch;

use report::{ProbeReport, TraceBuffer};

/// Parse an HTML string and run the default PEP-toggle probe against it.
/// This is the primary entry point for formprobe-core.
pub fn probe_html(html: &str) -> ProbeReport {
    let mut page = page::Page::from_html(html);
    let spec = probe::ProbeSpec::default();
    // An in-memory page never becomes ready later; one attempt is enough.
    let poll = probe::PollConfig::immediate();
    let mut trace = TraceBuffer::default();
    let outcome = probe::run(&mut page, &spec, &poll, &mut trace);
    ProbeReport {
        outcome,
        trace: trace.into_lines(),
    }
}
