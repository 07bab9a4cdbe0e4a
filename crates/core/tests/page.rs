//! Tests for the Page API: lookup, click simulation, checked mutation,
//! change dispatch, and visibility resolution.

use formprobe_core::page::Page;
use pretty_assertions::assert_eq;

const MODAL_PAGE: &str = r#"
<html>
<head><style>.hidden { display: none; }</style></head>
<body>
    <button id="open-btn"
            onclick="document.getElementById('dialog').classList.remove('hidden')">Open</button>
    <div id="dialog" class="hidden">
        <form>
            <input type="checkbox" name="notify"
                   onchange="document.getElementById('email-row').classList.toggle('hidden', !this.checked)">
            <div id="email-row" class="hidden">
                <input type="email" name="email">
            </div>
        </form>
    </div>
    <input type="checkbox" name="notify">
</body>
</html>
"#;

#[test]
fn test_element_by_id() {
    let page = Page::from_html(MODAL_PAGE);

    let button = page.element_by_id("open-btn").unwrap();
    assert_eq!(button.tag, "button");
    assert_eq!(button.id.as_deref(), Some("open-btn"));

    assert!(page.element_by_id("no-such-id").is_none());
}

#[test]
fn test_query_selector_scoped_to_container() {
    let page = Page::from_html(MODAL_PAGE);

    // Two checkboxes share the name; the scoped selector must resolve
    // the one inside the dialog.
    let scoped = page
        .query_selector("#dialog input[name=\"notify\"]")
        .unwrap();
    assert_eq!(scoped.input_type.as_deref(), Some("checkbox"));

    // The page-level one is reachable without the scope.
    assert!(page.query_selector("input[name=\"notify\"]").is_some());
    assert!(page.query_selector("#dialog input[name=\"missing\"]").is_none());
}

#[test]
fn test_click_applies_listener() {
    let mut page = Page::from_html(MODAL_PAGE);

    assert_eq!(page.is_hidden("dialog"), Some(true));
    assert!(page.click("open-btn"));
    assert_eq!(page.is_hidden("dialog"), Some(false));
}

#[test]
fn test_click_missing_element() {
    let mut page = Page::from_html(MODAL_PAGE);
    assert!(!page.click("no-such-id"));
}

#[test]
fn test_click_without_listener_is_harmless() {
    let mut page = Page::from_html(r#"<html><body><button id="b">Ok</button></body></html>"#);
    assert!(page.click("b"));
}

#[test]
fn test_set_checked_and_snapshot() {
    let mut page = Page::from_html(MODAL_PAGE);
    let selector = "#dialog input[name=\"notify\"]";

    assert!(!page.query_selector(selector).unwrap().checked);
    assert!(page.set_checked(selector, true));
    assert!(page.query_selector(selector).unwrap().checked);
    assert!(page.set_checked(selector, false));
    assert!(!page.query_selector(selector).unwrap().checked);

    assert!(!page.set_checked("#dialog input[name=\"missing\"]", true));
}

#[test]
fn test_dispatch_change_follows_checked_state() {
    let mut page = Page::from_html(MODAL_PAGE);
    let selector = "#dialog input[name=\"notify\"]";

    assert_eq!(page.is_hidden("email-row"), Some(true));

    page.set_checked(selector, true);
    assert!(page.dispatch_change(selector));
    assert_eq!(page.is_hidden("email-row"), Some(false));

    page.set_checked(selector, false);
    assert!(page.dispatch_change(selector));
    assert_eq!(page.is_hidden("email-row"), Some(true));

    assert!(!page.dispatch_change("#dialog input[name=\"missing\"]"));
}

#[test]
fn test_is_hidden_sources() {
    let page = Page::from_html(
        r#"
        <html>
        <head><style>.hidden { display: none; } #gone { display: none; }</style></head>
        <body>
            <div id="by-class" class="hidden"></div>
            <div id="gone"></div>
            <div id="by-style" style="display: none;"></div>
            <div id="by-attr" hidden></div>
            <div id="visible"></div>
        </body>
        </html>
        "#,
    );

    assert_eq!(page.is_hidden("by-class"), Some(true));
    assert_eq!(page.is_hidden("gone"), Some(true));
    assert_eq!(page.is_hidden("by-style"), Some(true));
    assert_eq!(page.is_hidden("by-attr"), Some(true));
    assert_eq!(page.is_hidden("visible"), Some(false));
    assert_eq!(page.is_hidden("absent"), None);
}

#[test]
fn test_form_controls() {
    let page = Page::from_html(MODAL_PAGE);
    let controls = page.form_controls();

    assert_eq!(controls.len(), 3);
    assert_eq!(controls[0].input_type.as_deref(), Some("checkbox"));
    assert_eq!(controls[1].input_type.as_deref(), Some("email"));
    assert_eq!(controls[2].name.as_deref(), Some("notify"));
}

#[test]
fn test_behaviors_detected_on_load() {
    let page = Page::from_html(MODAL_PAGE);
    assert_eq!(page.behaviors().len(), 2);
}
