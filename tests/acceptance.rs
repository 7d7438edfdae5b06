use caretpad_core::{
    BoundedStack, CaretRing, EditOutcome, Error, History, HistoryConfig, Push, RopeSurface,
    SearchOptions, Snapshot, Source, TextSurface,
};
use caretpad_session::Editor;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn capacity_twenty_stack_keeps_first_twenty() {
    let mut stack = BoundedStack::new(20);
    let mut full = 0;
    for i in 0..25 {
        if stack.push(Snapshot::new(format!("v{i}"))) == Push::Full {
            full += 1;
        }
    }
    assert_eq!(stack.len(), 20);
    assert_eq!(full, 5);
    for i in (0..20).rev() {
        assert_eq!(stack.pop().unwrap().content(), format!("v{i}"));
    }
    assert!(stack.pop().is_none());
}

#[test]
fn edits_at_scenario_times_take_two_snapshots() {
    let mut surface = RopeSurface::from_text("");
    let mut history = History::default();
    let mut recorded = Vec::new();
    for (i, t) in [0, 1000, 2000, 6000, 7000].into_iter().enumerate() {
        surface.insert(i, "x");
        if history.on_edit(&surface.text(), ms(t)) == EditOutcome::Recorded {
            recorded.push(t);
        }
    }
    assert_eq!(recorded, vec![0, 6000]);
    assert_eq!(history.undo_depth(), 2);
}

#[test]
fn undo_redo_round_trip_over_many_steps() {
    let mut ed = Editor::new(RopeSurface::from_text(""), HistoryConfig::default());
    for i in 0..8u64 {
        let len = ed.surface().len_chars();
        ed.insert(len, &i.to_string(), ms(i * 5000)).unwrap();
        ed.insert(len + 1, ".", ms(i * 5000 + 10)).unwrap();
    }
    let mut texts = Vec::new();
    while ed.history().can_undo() {
        let before = ed.surface().text();
        ed.undo().unwrap();
        texts.push(ed.surface().text());
        ed.redo().unwrap();
        assert_eq!(ed.surface().text(), before);
        ed.undo().unwrap();
    }
    assert_eq!(texts.len(), 8);
    assert_eq!(ed.undo(), Err(Error::Empty(Source::Undo)));
}

#[test]
fn post_undo_edit_discards_redo_path() {
    let mut ed = Editor::new(RopeSurface::from_text(""), HistoryConfig::default());
    ed.insert(0, "a", ms(0)).unwrap();
    ed.insert(1, "b", ms(5000)).unwrap();
    ed.undo().unwrap();
    assert!(ed.history().can_redo());
    ed.insert(0, "z", ms(10_000)).unwrap();
    assert!(!ed.history().can_redo());
    assert_eq!(ed.redo(), Err(Error::Empty(Source::Redo)));
}

#[test]
fn ring_from_search_closes_cycle() {
    let mut ring = CaretRing::new();
    ring.rebuild(&[5, 12, 20]);
    let start = ring.current().unwrap();
    for _ in 0..3 {
        ring.move_next().unwrap();
    }
    assert_eq!(ring.current(), Some(start));

    ring.rebuild(&[]);
    assert_eq!(ring.move_next(), Err(Error::Empty(Source::Ring)));
    assert_eq!(ring.move_prev(), Err(Error::Empty(Source::Ring)));
}

#[test]
fn tiny_debounce_snapshots_every_edit() {
    let config = HistoryConfig {
        capacity: 4,
        debounce: Duration::ZERO,
        reset_full_undo: false,
    };
    let mut ed = Editor::new(RopeSurface::from_text(""), config);
    for i in 0..6 {
        ed.insert(i, "x", ms(i as u64)).unwrap();
    }
    assert_eq!(ed.history().undo_depth(), 4);
    assert_eq!(ed.find("x", SearchOptions::default()), Ok(6));
}
