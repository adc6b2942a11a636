//! Invariants checked over randomized operation sequences.
//!
//! Every sequence is driven by a fixed-seed `StdRng`, so failures reproduce.

use std::collections::HashSet;
use std::sync::Arc;

use horizon_assistant::{Action, Assistant, Intent, Page, PageKind, Transition};
use horizon_assistant_core::{AssistantError, PageId, Propagation};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 4] = [1, 7, 42, 2024];

fn setup() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn random_kind(rng: &mut StdRng) -> PageKind {
    PageKind::ALL[rng.gen_range(0..PageKind::ALL.len())]
}

fn random_page(rng: &mut StdRng) -> Page {
    Page::new(PageId::new())
        .with_kind(random_kind(rng))
        .with_complete(rng.gen_bool(0.7))
        .with_visible(rng.gen_bool(0.85))
}

fn random_existing(assistant: &Assistant, rng: &mut StdRng) -> Option<PageId> {
    let len = assistant.get_n_pages();
    if len == 0 {
        return None;
    }
    assistant.get_nth_page(rng.gen_range(0..len) as i32)
}

/// Apply one random operation, ignoring refused ones.
fn random_op(assistant: &mut Assistant, rng: &mut StdRng) {
    match rng.gen_range(0..10) {
        0 | 1 => {
            let _ = assistant.next_page();
        }
        2 => {
            let _ = assistant.previous_page();
        }
        3 => {
            let len = assistant.get_n_pages() as i32;
            let _ = assistant.set_current_page(rng.gen_range(-1..=len));
        }
        4 => {
            if let Some(id) = random_existing(assistant, rng) {
                let _ = assistant.remove_page(id);
            }
        }
        5 => {
            let len = assistant.get_n_pages() as i32;
            let page = random_page(rng);
            let _ = assistant.insert_page(page, rng.gen_range(-1..=len));
        }
        6 => {
            if let Some(id) = random_existing(assistant, rng) {
                let _ = assistant.set_page_visible(id, rng.gen_bool(0.6));
            }
        }
        7 => {
            if let Some(id) = random_existing(assistant, rng) {
                let _ = assistant.set_page_complete(id, rng.gen_bool(0.6));
            }
        }
        8 => {
            if let Some(id) = random_existing(assistant, rng) {
                let _ = assistant.set_page_kind(id, random_kind(rng));
            }
        }
        _ => {
            let intent = [
                Intent::Forward,
                Intent::Back,
                Intent::Apply,
                Intent::Last,
                Intent::Cancel,
                Intent::Close,
            ][rng.gen_range(0..6)];
            let _ = assistant.deliver(intent);
        }
    }
}

fn populated(rng: &mut StdRng, n: usize) -> Assistant {
    let mut assistant = Assistant::new();
    for _ in 0..n {
        assistant.append_page(random_page(rng)).unwrap();
    }
    assistant
}

#[test]
fn test_identities_are_unique() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = Assistant::new();
        let mut inserted = Vec::new();

        for _ in 0..40 {
            let len = assistant.get_n_pages() as i32;
            // Re-inserting a known identity must be refused
            if !inserted.is_empty() && rng.gen_bool(0.2) {
                let id = inserted[rng.gen_range(0..inserted.len())];
                assert_eq!(
                    assistant.insert_page(Page::new(id), -1),
                    Err(AssistantError::DuplicateIdentity(id))
                );
                continue;
            }
            let page = random_page(&mut rng);
            inserted.push(page.id());
            assistant
                .insert_page(page, rng.gen_range(-1..=len))
                .unwrap();
        }

        let n = assistant.get_n_pages();
        assert_eq!(n, inserted.len());
        let seen: HashSet<PageId> = (0..n)
            .filter_map(|i| assistant.get_nth_page(i as i32))
            .collect();
        assert_eq!(seen.len(), n);
    }
}

#[test]
fn test_attribute_changes_keep_indices() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = populated(&mut rng, 8);
        assistant.map();

        let order: Vec<PageId> = assistant.pages().ids().collect();
        for _ in 0..60 {
            let id = order[rng.gen_range(0..order.len())];
            match rng.gen_range(0..4) {
                0 => assistant.set_page_kind(id, random_kind(&mut rng)).unwrap(),
                1 => assistant
                    .set_page_title(id, Some(format!("page {}", rng.gen_range(0..3))))
                    .unwrap(),
                2 => assistant.set_page_complete(id, rng.gen_bool(0.5)).unwrap(),
                _ => assistant.set_page_visible(id, rng.gen_bool(0.5)).unwrap(),
            }
            for (index, &id) in order.iter().enumerate() {
                assert_eq!(assistant.page_index(id), Some(index));
            }
        }
    }
}

#[test]
fn test_history_refers_to_registered_pages() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = populated(&mut rng, 6);
        assistant.map();

        for _ in 0..300 {
            random_op(&mut assistant, &mut rng);

            for id in assistant.history().iter() {
                assert!(assistant.page(id).is_some(), "stale history entry {}", id);
            }
            if let Some(current) = assistant.current_page() {
                let page = assistant.page(current).expect("current page is registered");
                assert!(page.is_visible(), "current page {} is hidden", current);
            }
        }
    }
}

#[test]
fn test_commit_is_monotone() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = populated(&mut rng, 6);
        assistant.map();
        for _ in 0..20 {
            random_op(&mut assistant, &mut rng);
        }

        assistant.commit();
        for _ in 0..200 {
            random_op(&mut assistant, &mut rng);
            if rng.gen_bool(0.1) {
                assistant.commit();
            }
            assert!(assistant.is_committed());
            assert!(!assistant.action_state().is_visible(Action::Cancel));
        }
    }
}

#[test]
fn test_running_progress_gates_cancel_and_close() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = Assistant::new();
        let progress = PageId::new();
        assistant
            .append_page(Page::new(PageId::new()).with_complete(true))
            .unwrap();
        assistant
            .append_page(Page::new(progress).with_kind(PageKind::Progress))
            .unwrap();
        assistant
            .append_page(Page::new(PageId::new()).with_kind(PageKind::Summary))
            .unwrap();
        assistant.map();
        assistant.next_page().unwrap();
        assert_eq!(assistant.current_page(), Some(progress));

        let fired = Arc::new(Mutex::new(0));
        let sink = fired.clone();
        assistant.cancel.connect(move |_| *sink.lock() += 1);
        let sink = fired.clone();
        assistant.close.connect(move |_| *sink.lock() += 1);

        for _ in 0..rng.gen_range(1..20) {
            let intent = if rng.gen_bool(0.5) {
                Intent::Cancel
            } else {
                Intent::Close
            };
            assert!(matches!(
                assistant.deliver(intent),
                Err(AssistantError::ProgressGated(_))
            ));
            assert_eq!(assistant.current_page(), Some(progress));
        }
        assert_eq!(*fired.lock(), 0);
    }
}

#[test]
fn test_default_flow_lands_on_next_visible() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = Assistant::new();
        let visibility: Vec<bool> = (0..10).map(|_| rng.gen_bool(0.6)).collect();
        for &visible in &visibility {
            assistant
                .append_page(Page::new(PageId::new()).with_complete(true).with_visible(visible))
                .unwrap();
        }
        assistant.map();

        for i in (0..visibility.len()).filter(|&i| visibility[i]) {
            assistant.set_current_page(i as i32).unwrap();
            let expected = (i + 1..visibility.len()).find(|&j| visibility[j]);

            let result = assistant.next_page();
            match expected {
                Some(j) => {
                    assert_eq!(result, Ok(()));
                    assert_eq!(assistant.get_current_page_index(), Some(j));
                }
                None => {
                    assert!(matches!(result, Err(AssistantError::FlowBroken { .. })));
                    assert_eq!(assistant.get_current_page_index(), Some(i));
                }
            }
        }
    }
}

#[test]
fn test_back_skips_progress_pages() {
    setup();
    let mut assistant = Assistant::new();
    let ids: Vec<PageId> = (0..4).map(|_| PageId::new()).collect();
    assistant
        .append_page(Page::new(ids[0]).with_complete(true))
        .unwrap();
    assistant
        .append_page(Page::new(ids[1]).with_complete(true))
        .unwrap();
    assistant
        .append_page(
            Page::new(ids[2])
                .with_kind(PageKind::Progress)
                .with_complete(true),
        )
        .unwrap();
    assistant
        .append_page(Page::new(ids[3]).with_complete(true))
        .unwrap();
    assistant.map();

    for _ in 0..3 {
        assistant.deliver(Intent::Forward).unwrap();
    }
    assert_eq!(assistant.current_page(), Some(ids[3]));

    assistant.deliver(Intent::Back).unwrap();
    assert_eq!(assistant.current_page(), Some(ids[1]));
}

#[test]
fn test_prepare_reentry_settles_on_redirect_target() {
    setup();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assistant = Assistant::new();
        let ids: Vec<PageId> = (0..6).map(|_| PageId::new()).collect();
        for &id in &ids {
            assistant
                .append_page(Page::new(id).with_complete(true))
                .unwrap();
        }
        assistant.map();

        let trigger = ids[rng.gen_range(1..ids.len())];
        let target = ids[rng.gen_range(0..ids.len())];
        let fired = Arc::new(Mutex::new(false));
        let once = fired.clone();
        assistant.prepare.connect(move |t: &mut Transition| {
            let mut fired = once.lock();
            if t.page() == trigger && !*fired {
                *fired = true;
                t.redirect_to(target);
            }
            Propagation::Continue
        });

        assistant.set_current_page_to(trigger).unwrap();
        assert!(*fired.lock());
        if target == trigger {
            assert_eq!(assistant.current_page(), Some(trigger));
        } else {
            assert_eq!(assistant.current_page(), Some(target));
        }

        // Nothing overwrites the redirect afterwards
        assistant.update_actions();
        assert_eq!(assistant.current_page(), Some(target));
    }
}
