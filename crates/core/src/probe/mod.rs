//! The PEP-toggle probe: open the add-member form, find the PEP checkbox
//! and its dependent position container, toggle the checkbox both ways,
//! and log the container's visibility after each change.
//!
//! The sequence is linear and runs to completion. Element absence is
//! data, not an error: a missing trigger ends the run, missing form
//! elements skip the toggle steps, and neither outcome escalates beyond
//! the log.

pub mod wait;

use crate::page::Page;
use crate::report::Reporter;
use serde::Serialize;

pub use wait::{poll_until, PollConfig};

/// The anchors the probe resolves on the page under test. Defaults are
/// the member-registration page this probe was written for.
#[derive(Debug, Clone)]
pub struct ProbeSpec {
    /// id of the control that opens the add-member modal.
    pub trigger_id: String,
    /// id of the modal the checkbox lives in.
    pub modal_id: String,
    /// form-field name of the PEP checkbox.
    pub checkbox_name: String,
    /// id of the container expected to follow the checkbox state.
    pub container_id: String,
}

impl Default for ProbeSpec {
    fn default() -> Self {
        Self {
            trigger_id: "add-member-btn".to_string(),
            modal_id: "miembro-modal".to_string(),
            checkbox_name: "es_pep".to_string(),
            container_id: "pep-position-container".to_string(),
        }
    }
}

impl ProbeSpec {
    /// Selector for the checkbox, scoped to the modal.
    pub fn checkbox_selector(&self) -> String {
        format!("#{} input[name=\"{}\"]", self.modal_id, self.checkbox_name)
    }
}

/// Terminal state of a probe run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Both toggle assertions ran.
    Completed {
        hidden_after_check: bool,
        hidden_after_uncheck: bool,
    },
    /// The trigger control was never found; nothing else ran.
    TriggerMissing,
    /// The trigger was clicked but the checkbox or container never
    /// appeared; the toggle steps were skipped.
    ElementsMissing {
        checkbox_found: bool,
        container_found: bool,
    },
}

/// Run the probe against a page, streaming one line per step.
pub fn run(
    page: &mut Page,
    spec: &ProbeSpec,
    poll: &PollConfig,
    reporter: &mut dyn Reporter,
) -> ProbeOutcome {
    reporter.line("Testing PEP checkbox functionality...");

    let trigger = poll_until(poll, || page.element_by_id(&spec.trigger_id));
    if trigger.is_none() {
        reporter.line("Add member button not found");
        return ProbeOutcome::TriggerMissing;
    }
    page.click(&spec.trigger_id);
    reporter.line("Add member button clicked");

    let selector = spec.checkbox_selector();
    let located = poll_until(poll, || {
        let checkbox = page.query_selector(&selector)?;
        page.element_by_id(&spec.container_id)?;
        Some(checkbox)
    });

    let checkbox = match located {
        Some(checkbox) => checkbox,
        None => {
            // Resolve each once more so the diagnostic names the one
            // that is actually absent.
            let checkbox_found = page.query_selector(&selector).is_some();
            let container_found = page.element_by_id(&spec.container_id).is_some();
            reporter.line("PEP elements not found");
            reporter.line(&format!("checkbox: {}", found_word(checkbox_found)));
            reporter.line(&format!("container: {}", found_word(container_found)));
            return ProbeOutcome::ElementsMissing {
                checkbox_found,
                container_found,
            };
        }
    };

    reporter.line("PEP elements found");
    reporter.line(&format!("PEP checkbox checked: {}", checkbox.checked));
    reporter.line(&format!(
        "Position container hidden: {}",
        container_hidden(page, spec)
    ));

    page.set_checked(&selector, true);
    page.dispatch_change(&selector);
    reporter.line("After checking PEP:");
    let hidden_after_check = container_hidden(page, spec);
    reporter.line(&format!("Position container hidden: {}", hidden_after_check));

    page.set_checked(&selector, false);
    page.dispatch_change(&selector);
    reporter.line("After unchecking PEP:");
    let hidden_after_uncheck = container_hidden(page, spec);
    reporter.line(&format!(
        "Position container hidden: {}",
        hidden_after_uncheck
    ));

    ProbeOutcome::Completed {
        hidden_after_check,
        hidden_after_uncheck,
    }
}

fn container_hidden(page: &Page, spec: &ProbeSpec) -> bool {
    page.is_hidden(&spec.container_id).unwrap_or(false)
}

fn found_word(found: bool) -> &'static str {
    if found {
        "found"
    } else {
        "not found"
    }
}
