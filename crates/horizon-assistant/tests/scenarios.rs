//! End-to-end navigation scenarios.

use std::sync::Arc;

use horizon_assistant::{Action, Assistant, Intent, Page, PageKind, Transition};
use horizon_assistant_core::{AssistantError, PageId, Propagation};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Prepare(PageId),
    Apply,
    Close,
    Cancel,
}

fn setup() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn build(assistant: &mut Assistant, pages: &[(PageKind, bool)]) -> Vec<PageId> {
    pages
        .iter()
        .map(|&(kind, complete)| {
            let id = PageId::new();
            assistant
                .append_page(Page::new(id).with_kind(kind).with_complete(complete))
                .unwrap();
            id
        })
        .collect()
}

fn record_events(assistant: &Assistant) -> Arc<Mutex<Vec<Event>>> {
    let events = Arc::new(Mutex::new(Vec::new()));

    let sink = events.clone();
    assistant
        .prepare
        .connect_observer(move |t: &Transition| sink.lock().push(Event::Prepare(t.page())));
    let sink = events.clone();
    assistant.apply.connect(move |_| sink.lock().push(Event::Apply));
    let sink = events.clone();
    assistant.close.connect(move |_| sink.lock().push(Event::Close));
    let sink = events.clone();
    assistant.cancel.connect(move |_| sink.lock().push(Event::Cancel));

    events
}

#[test]
fn test_linear_confirm_apply() {
    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Intro, true),
            (PageKind::Content, true),
            (PageKind::Confirm, true),
            (PageKind::Summary, true),
        ],
    );
    let (a, b, c, d) = (p[0], p[1], p[2], p[3]);

    assistant.map();
    let events = record_events(&assistant);

    assistant.deliver(Intent::Forward).unwrap();
    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.history().to_vec(), vec![b, a]);

    assistant.deliver(Intent::Apply).unwrap();

    assert_eq!(
        *events.lock(),
        vec![
            Event::Prepare(b),
            Event::Prepare(c),
            Event::Apply,
            Event::Prepare(d)
        ]
    );
    assert_eq!(assistant.current_page(), Some(d));
    assert_eq!(assistant.history().to_vec(), vec![c, b, a]);

    let state = assistant.action_state();
    assert_eq!(state.visible_actions(), vec![Action::Close]);

    assistant.deliver(Intent::Close).unwrap();
    assert_eq!(events.lock().last(), Some(&Event::Close));
}

#[test]
fn test_progress_gate() {
    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Intro, true),
            (PageKind::Content, true),
            (PageKind::Progress, false),
            (PageKind::Summary, true),
        ],
    );
    let x = p[2];

    assistant.map();
    assistant.deliver(Intent::Forward).unwrap();
    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.current_page(), Some(x));

    let events = record_events(&assistant);
    assert_eq!(
        assistant.deliver(Intent::Cancel),
        Err(AssistantError::ProgressGated("cancel"))
    );
    assert!(assistant.deliver(Intent::Cancel).is_err());
    assert_eq!(
        assistant.deliver(Intent::Close),
        Err(AssistantError::ProgressGated("close"))
    );
    assert_eq!(assistant.current_page(), Some(x));
    assert!(events.lock().is_empty());

    assistant.set_page_complete(x, true).unwrap();
    assistant.deliver(Intent::Cancel).unwrap();
    assert_eq!(*events.lock(), vec![Event::Cancel]);
}

#[test]
fn test_back_across_invisible() {
    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Content, true),
            (PageKind::Content, true),
            (PageKind::Content, true),
            (PageKind::Content, true),
        ],
    );
    let (a, b, c) = (p[0], p[1], p[2]);
    assistant.set_page_visible(b, false).unwrap();

    assistant.map();
    assert_eq!(assistant.current_page(), Some(a));

    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.current_page(), Some(c));

    assistant.deliver(Intent::Back).unwrap();
    assert_eq!(assistant.current_page(), Some(a));

    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.current_page(), Some(c));

    assistant.deliver(Intent::Back).unwrap();
    assistant.set_page_visible(b, true).unwrap();
    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.current_page(), Some(b));
}

#[test]
fn test_commit_hides_cancel() {
    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Intro, true),
            (PageKind::Confirm, true),
            (PageKind::Progress, false),
            (PageKind::Summary, true),
        ],
    );
    let (x, d) = (p[2], p[3]);

    assistant.map();
    assistant.deliver(Intent::Forward).unwrap();
    assistant.deliver(Intent::Apply).unwrap();
    assert_eq!(assistant.current_page(), Some(x));

    assistant.commit();
    assert!(assistant.history().is_empty());
    assert!(!assistant.action_state().is_visible(Action::Cancel));

    assistant.set_page_complete(x, true).unwrap();
    assert!(!assistant.action_state().is_visible(Action::Cancel));

    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.current_page(), Some(d));
    assert!(!assistant.action_state().is_visible(Action::Cancel));
}

#[test]
fn test_prepare_reassigns_current_page() {
    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Content, true),
            (PageKind::Content, true),
            (PageKind::Content, true),
        ],
    );
    let (a, b, c) = (p[0], p[1], p[2]);

    assistant.map();
    assistant.prepare.connect(move |t: &mut Transition| {
        if t.page() == b {
            t.redirect_to_index(2);
        }
        Propagation::Continue
    });
    let events = record_events(&assistant);
    let settled = Arc::new(Mutex::new(Vec::new()));
    let sink = settled.clone();
    assistant
        .current_page_changed
        .connect(move |page| sink.lock().push(*page));

    assistant.deliver(Intent::Forward).unwrap();

    assert_eq!(assistant.current_page(), Some(c));
    assert_eq!(*events.lock(), vec![Event::Prepare(b), Event::Prepare(c)]);
    // Only the final page settles
    assert_eq!(*settled.lock(), vec![Some(c)]);
    assert_eq!(assistant.history().to_vec(), vec![b, a]);
}

#[test]
fn test_last_button_projection() {
    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Content, true),
            (PageKind::Content, true),
            (PageKind::Content, true),
            (PageKind::Confirm, true),
        ],
    );
    let (a, d) = (p[0], p[3]);

    assistant.map();
    assert_eq!(assistant.current_page(), Some(a));
    assert!(assistant.action_state().is_visible(Action::Last));

    assistant.remove_page(d).unwrap();
    assert_eq!(assistant.current_page(), Some(a));
    assert!(!assistant.action_state().is_visible(Action::Last));
}

#[test]
fn test_custom_flow_with_context() {
    use horizon_assistant::{ContextFlow, PageRegistry};

    setup();
    let mut assistant = Assistant::new();
    let p = build(
        &mut assistant,
        &[
            (PageKind::Intro, true),
            (PageKind::Content, true),
            (PageKind::Content, true),
            (PageKind::Summary, true),
        ],
    );

    // Skip the optional page when the context says so
    let torn_down = Arc::new(Mutex::new(false));
    let flag = torn_down.clone();
    assistant.set_forward_page_func(
        ContextFlow::new(true, |current, skip_optional: &bool, pages: &PageRegistry| {
            let next = if current == 0 && *skip_optional { 2 } else { current + 1 };
            Some(next).filter(|&n| n < pages.len())
        })
        .with_teardown(move |_| *flag.lock() = true),
    );

    assistant.map();
    assistant.deliver(Intent::Forward).unwrap();
    assert_eq!(assistant.current_page(), Some(p[2]));

    drop(assistant);
    assert!(*torn_down.lock());
}
