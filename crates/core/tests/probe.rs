//! Probe tests using HTML fixtures to verify the full toggle sequence
//! and each failure path.

use formprobe_core::page::Page;
use formprobe_core::probe::{self, PollConfig, ProbeOutcome, ProbeSpec};
use formprobe_core::report::{ProbeReport, TraceBuffer};
use pretty_assertions::assert_eq;

fn load_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path, e))
}

fn page_from_fixture(name: &str) -> Page {
    Page::from_html(&load_fixture(name))
}

fn run_probe(page: &mut Page) -> (ProbeOutcome, Vec<String>) {
    let spec = ProbeSpec::default();
    let poll = PollConfig::immediate();
    let mut trace = TraceBuffer::default();
    let outcome = probe::run(page, &spec, &poll, &mut trace);
    (outcome, trace.into_lines())
}

#[test]
fn test_happy_path_trace() {
    let mut page = page_from_fixture("member_form.html");
    let (outcome, trace) = run_probe(&mut page);

    assert_eq!(
        outcome,
        ProbeOutcome::Completed {
            hidden_after_check: false,
            hidden_after_uncheck: true,
        }
    );

    assert_eq!(
        trace,
        vec![
            "Testing PEP checkbox functionality...",
            "Add member button clicked",
            "PEP elements found",
            "PEP checkbox checked: false",
            "Position container hidden: true",
            "After checking PEP:",
            "Position container hidden: false",
            "After unchecking PEP:",
            "Position container hidden: true",
        ]
    );
}

#[test]
fn test_happy_path_opens_modal() {
    let mut page = page_from_fixture("member_form.html");

    assert_eq!(page.is_hidden("miembro-modal"), Some(true));
    let (_, _) = run_probe(&mut page);
    assert_eq!(page.is_hidden("miembro-modal"), Some(false));
}

#[test]
fn test_missing_trigger_stops_immediately() {
    let mut page = page_from_fixture("missing_trigger.html");
    let (outcome, trace) = run_probe(&mut page);

    assert_eq!(outcome, ProbeOutcome::TriggerMissing);
    assert_eq!(
        trace,
        vec![
            "Testing PEP checkbox functionality...",
            "Add member button not found",
        ]
    );

    // No lookup beyond the trigger, and no mutation: the modal stays shut.
    assert_eq!(page.is_hidden("miembro-modal"), Some(true));
    let checkbox = page.query_selector("#miembro-modal input[name=\"es_pep\"]");
    assert_eq!(checkbox.map(|c| c.checked), Some(false));
}

#[test]
fn test_missing_checkbox_skips_toggles() {
    let mut page = page_from_fixture("missing_checkbox.html");
    let (outcome, trace) = run_probe(&mut page);

    assert_eq!(
        outcome,
        ProbeOutcome::ElementsMissing {
            checkbox_found: false,
            container_found: true,
        }
    );
    assert_eq!(
        trace,
        vec![
            "Testing PEP checkbox functionality...",
            "Add member button clicked",
            "PEP elements not found",
            "checkbox: not found",
            "container: found",
        ]
    );

    // The trigger click still happened; the toggles did not.
    assert_eq!(page.is_hidden("miembro-modal"), Some(false));
    assert_eq!(page.is_hidden("pep-position-container"), Some(true));
}

#[test]
fn test_missing_container_skips_toggles() {
    let mut page = page_from_fixture("missing_container.html");
    let (outcome, trace) = run_probe(&mut page);

    assert_eq!(
        outcome,
        ProbeOutcome::ElementsMissing {
            checkbox_found: true,
            container_found: false,
        }
    );
    assert!(trace.contains(&"PEP elements not found".to_string()));

    // No checkbox mutation on the skip path
    let checkbox = page
        .query_selector("#miembro-modal input[name=\"es_pep\"]")
        .unwrap();
    assert!(!checkbox.checked);
}

#[test]
fn test_idempotent_toggling() {
    let mut page = page_from_fixture("member_form.html");
    page.click("add-member-btn");

    let selector = ProbeSpec::default().checkbox_selector();

    // Same value twice, dispatch each time: the observed state must not
    // drift.
    page.set_checked(&selector, true);
    page.dispatch_change(&selector);
    assert_eq!(page.is_hidden("pep-position-container"), Some(false));
    page.set_checked(&selector, true);
    page.dispatch_change(&selector);
    assert_eq!(page.is_hidden("pep-position-container"), Some(false));

    page.set_checked(&selector, false);
    page.dispatch_change(&selector);
    assert_eq!(page.is_hidden("pep-position-container"), Some(true));
    page.set_checked(&selector, false);
    page.dispatch_change(&selector);
    assert_eq!(page.is_hidden("pep-position-container"), Some(true));
}

#[test]
fn test_probe_html_entry_point() {
    let report = formprobe_core::probe_html(&load_fixture("member_form.html"));

    assert_eq!(
        report.outcome,
        ProbeOutcome::Completed {
            hidden_after_check: false,
            hidden_after_uncheck: true,
        }
    );
    assert_eq!(report.trace.len(), 9);
}

#[test]
fn test_report_serialization() {
    let report = ProbeReport {
        outcome: ProbeOutcome::Completed {
            hidden_after_check: false,
            hidden_after_uncheck: true,
        },
        trace: vec!["Testing PEP checkbox functionality...".to_string()],
    };

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["result"], "completed");
    assert_eq!(json["hidden_after_check"], false);
    assert_eq!(json["hidden_after_uncheck"], true);
    assert_eq!(json["trace"][0], "Testing PEP checkbox functionality...");
}

#[test]
fn test_poll_until_retries_until_ready() {
    let poll = PollConfig {
        max_attempts: 5,
        interval: std::time::Duration::ZERO,
    };

    let mut attempts = 0;
    let value = probe::poll_until(&poll, || {
        attempts += 1;
        if attempts < 3 {
            None
        } else {
            Some(attempts)
        }
    });

    assert_eq!(value, Some(3));
}

#[test]
fn test_poll_until_gives_up() {
    let poll = PollConfig {
        max_attempts: 4,
        interval: std::time::Duration::ZERO,
    };

    let mut attempts = 0;
    let value: Option<()> = probe::poll_until(&poll, || {
        attempts += 1;
        None
    });

    assert_eq!(value, None);
    assert_eq!(attempts, 4);
}
