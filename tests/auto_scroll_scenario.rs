//! Auto-scroll scenario: follow while at the bottom, detach on a user
//! scroll away, and stay put while detached.

use vchat::model::NewMessage;
use vchat::state::{AutoScrollController, FollowState, MessageStore};
use vchat::view_state::{
    Align, HeightCache, HeightEstimator, HeightRefresh, ScrollEvent, ScrollTarget, Virtualizer,
};

/// Records scroll_to_index calls and forwards them to a real virtualizer.
struct Recording {
    inner: Virtualizer,
    calls: Vec<(usize, Align)>,
}

impl ScrollTarget for Recording {
    fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<ScrollEvent> {
        self.calls.push((index, align));
        self.inner.scroll_to_index(index, align)
    }
}

fn recording(container: u16) -> Recording {
    let cache = HeightCache::new(HeightEstimator::default(), HeightRefresh::Structural);
    let mut inner = Virtualizer::new(cache, 2);
    inner.set_container_height(container);
    Recording {
        inner,
        calls: Vec::new(),
    }
}

fn long_text(lines: usize) -> String {
    vec!["lorem ipsum"; lines].join("\n")
}

#[test]
fn follow_then_detach_then_ignore() {
    let mut store = MessageStore::new();
    let mut controller = AutoScrollController::default();
    let mut target = recording(10);

    // 1 message, FOLLOWING
    store.append(NewMessage::user(long_text(20)));
    target.inner.sync(store.snapshot());
    controller.on_list_update(store.snapshot(), &mut target);
    assert_eq!(controller.state(), FollowState::Following);
    target.calls.clear();

    // append a 2nd message: scroll_to_index(1, End)
    store.append(NewMessage::user(long_text(20)));
    target.inner.sync(store.snapshot());
    let (_, scrolled) = controller.on_list_update(store.snapshot(), &mut target);
    assert_eq!(target.calls, vec![(1, Align::End)]);
    let scrolled = scrolled.expect("following scrolls");
    assert!(scrolled.programmatic);
    assert_eq!(target.inner.scroll_offset(), target.inner.max_scroll());

    // a programmatic event does not change the state
    controller.on_scroll(scrolled, target.inner.total_height(), 10);
    assert_eq!(controller.state(), FollowState::Following);

    // user scroll far from the bottom: DETACHED
    let event = target.inner.scroll_to(0);
    controller.on_scroll(event, target.inner.total_height(), 10);
    assert_eq!(controller.state(), FollowState::Detached);

    // append a 3rd message: no scroll call
    target.calls.clear();
    store.append(NewMessage::user("third"));
    target.inner.sync(store.snapshot());
    let (_, scrolled) = controller.on_list_update(store.snapshot(), &mut target);
    assert!(target.calls.is_empty());
    assert_eq!(scrolled, None);
    assert_eq!(target.inner.scroll_offset(), 0);
}

#[test]
fn user_scroll_back_to_bottom_follows_again() {
    let mut store = MessageStore::new();
    let mut controller = AutoScrollController::default();
    let mut target = recording(10);
    store.append(NewMessage::user(long_text(40)));
    target.inner.sync(store.snapshot());

    let away = target.inner.scroll_to(0);
    controller.on_scroll(away, target.inner.total_height(), 10);
    assert_eq!(controller.state(), FollowState::Detached);

    let bottom = target.inner.max_scroll();
    let back = target.inner.scroll_to(bottom);
    controller.on_scroll(back, target.inner.total_height(), 10);
    assert_eq!(controller.state(), FollowState::Following);
}

#[test]
fn empty_list_update_is_noop() {
    let store = MessageStore::new();
    let mut controller = AutoScrollController::default();
    let mut target = recording(10);
    let (_, scrolled) = controller.on_list_update(store.snapshot(), &mut target);
    assert_eq!(scrolled, None);
    assert!(target.calls.is_empty());
}
