use clap::{Parser, Subcommand};
use formprobe_core::behavior::{Action, Anchor, Behavior, EventKind};
use formprobe_core::page::Page;
use formprobe_core::probe::{self, PollConfig, ProbeSpec};
use formprobe_core::report::{ConsoleReporter, ProbeReport, TraceBuffer};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "formprobe",
    about = "Zero-render smoke probe for conditional form fields"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the PEP-toggle probe against an HTML file or URL
    Run {
        /// HTML file to probe (use - for stdin), or an http(s) URL
        target: String,

        /// Output the full report as JSON instead of the live trace
        #[arg(long)]
        json: bool,

        /// id of the control that opens the add-member modal
        #[arg(long, default_value = "add-member-btn")]
        trigger: String,

        /// id of the modal the checkbox lives in
        #[arg(long, default_value = "miembro-modal")]
        modal: String,

        /// form-field name of the PEP checkbox
        #[arg(long, default_value = "es_pep")]
        checkbox: String,

        /// id of the dependent position container
        #[arg(long, default_value = "pep-position-container")]
        container: String,

        /// Maximum element-lookup attempts per step
        #[arg(long, default_value_t = 5)]
        poll_attempts: u32,

        /// Sleep between lookup attempts, in milliseconds
        #[arg(long, default_value_t = 200)]
        poll_interval_ms: u64,
    },
    /// Parse an HTML file and print detected listeners and form controls
    Inspect {
        /// The HTML file to parse (use - for stdin)
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            target,
            json,
            trigger,
            modal,
            checkbox,
            container,
            poll_attempts,
            poll_interval_ms,
        } => {
            let mut page = load_page(&target);
            let spec = ProbeSpec {
                trigger_id: trigger,
                modal_id: modal,
                checkbox_name: checkbox,
                container_id: container,
            };
            let poll = PollConfig {
                max_attempts: poll_attempts,
                interval: Duration::from_millis(poll_interval_ms),
            };

            // The probe's own outcome never changes the exit code; only
            // failing to obtain a document does.
            if json {
                let mut trace = TraceBuffer::default();
                let outcome = probe::run(&mut page, &spec, &poll, &mut trace);
                let report = ProbeReport {
                    outcome,
                    trace: trace.into_lines(),
                };
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
            } else {
                let mut reporter = ConsoleReporter;
                probe::run(&mut page, &spec, &poll, &mut reporter);
            }
        }
        Commands::Inspect { file, json } => {
            let html = read_input(&file);
            let page = Page::from_html(&html);
            print_inspection(&page, json);
        }
    }
}

fn load_page(target: &str) -> Page {
    if target.starts_with("http://") || target.starts_with("https://") {
        return fetch_page(target);
    }
    Page::from_html(&read_input(target))
}

#[cfg(feature = "fetch")]
fn fetch_page(url: &str) -> Page {
    use formprobe_core::fetch;

    match fetch::fetch_page(url, &fetch::FetchConfig::default()) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "fetch"))]
fn fetch_page(url: &str) -> Page {
    eprintln!("Error: {} is a URL but this build has no fetch support", url);
    std::process::exit(1);
}

fn read_input(file: &str) -> String {
    if file == "-" {
        use std::io::Read;
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("Error: failed to read stdin: {}", e);
            std::process::exit(1);
        }
        buf
    } else {
        match std::fs::read_to_string(file) {
            Ok(html) => html,
            Err(e) => {
                eprintln!("Error: failed to read {}: {}", file, e);
                std::process::exit(1);
            }
        }
    }
}

fn print_inspection(page: &Page, as_json: bool) {
    if as_json {
        let value = serde_json::json!({
            "behaviors": page.behaviors(),
            "controls": page.form_controls(),
        });
        println!("{}", serde_json::to_string_pretty(&value).unwrap());
        return;
    }

    println!("behaviors: {}", page.behaviors().len());
    for behavior in page.behaviors() {
        println!("  {}", describe_behavior(behavior));
    }
    let controls = page.form_controls();
    println!("controls: {}", controls.len());
    for control in &controls {
        let mut parts = vec![control.tag.clone()];
        if let Some(ref t) = control.input_type {
            parts.push(format!("type={}", t));
        }
        if let Some(ref name) = control.name {
            parts.push(format!("name={}", name));
        }
        if let Some(ref id) = control.id {
            parts.push(format!("id={}", id));
        }
        if control.checked {
            parts.push("checked".to_string());
        }
        println!("  [{}]", parts.join(" "));
    }
}

fn describe_behavior(behavior: &Behavior) -> String {
    let anchor = match &behavior.anchor {
        Anchor::Id(id) => format!("#{}", id),
        Anchor::Name(name) => format!("[name={}]", name),
    };
    let event = match behavior.event {
        EventKind::Click => "click",
        EventKind::Change => "change",
    };
    let effect = match &behavior.action {
        Action::AddClass { target, class } => {
            format!("add class \"{}\" on #{}", class, target)
        }
        Action::RemoveClass { target, class } => {
            format!("remove class \"{}\" on #{}", class, target)
        }
        Action::ToggleClass { target, class } => {
            format!("toggle class \"{}\" on #{}", class, target)
        }
        Action::SyncClass {
            target,
            class,
            when_checked,
        } => {
            let state = if *when_checked { "checked" } else { "unchecked" };
            format!("sync class \"{}\" on #{} (present when {})", class, target, state)
        }
        Action::SetDisplay { target, visible } => {
            let which = if *visible { "show" } else { "hide" };
            format!("{} #{}", which, target)
        }
        Action::ToggleDisplay { target } => format!("toggle display of #{}", target),
    };
    format!("{} {} -> {}", event, anchor, effect)
}
