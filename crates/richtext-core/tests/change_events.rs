use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use richtext_core::{
    EditableStyledDocument, ParagraphChange, PlainTextChange, StyledDocument, TextChange,
};

/// A minimal undo collaborator: records plain changes, coalescing where possible, and skips
/// changes that arrive while it is replaying.
#[derive(Default)]
struct UndoLog {
    changes: Vec<PlainTextChange>,
    replaying: bool,
}

impl UndoLog {
    fn record(&mut self, change: &PlainTextChange) {
        if self.replaying {
            return;
        }
        if let Some(last) = self.changes.last() {
            if let Some(merged) = last.merge_with(change) {
                *self.changes.last_mut().unwrap() = merged;
                return;
            }
        }
        self.changes.push(change.clone());
    }
}

fn undo(doc: &mut EditableStyledDocument<u8>, log: &Arc<Mutex<UndoLog>>) {
    let change = {
        let mut log = log.lock().unwrap();
        log.replaying = true;
        log.changes.pop()
    };
    if let Some(change) = change {
        doc.apply_plain_change(&change.invert()).unwrap();
    }
    log.lock().unwrap().replaying = false;
}

#[test]
fn test_typing_coalesces_into_one_undo_unit() {
    let mut doc = EditableStyledDocument::with_text("start ", 0u8);
    let log = Arc::new(Mutex::new(UndoLog::default()));
    let sink = Arc::clone(&log);
    doc.subscribe_plain(move |change| sink.lock().unwrap().record(change));

    let mut offset = doc.len();
    for ch in ["h", "e", "l", "l", "o"] {
        doc.insert_text(offset, ch).unwrap();
        offset += 1;
    }
    // Backspace twice.
    doc.delete_text(offset - 1, offset).unwrap();
    doc.delete_text(offset - 2, offset - 1).unwrap();
    assert_eq!(doc.text(), "start hel");

    {
        let log = log.lock().unwrap();
        assert_eq!(log.changes, vec![TextChange::new(6, String::new(), "hel".to_string())]);
    }

    undo(&mut doc, &log);
    assert_eq!(doc.text(), "start ");
    assert!(log.lock().unwrap().changes.is_empty());
}

#[test]
fn test_unrelated_edits_stay_separate() {
    let mut doc = EditableStyledDocument::with_text("abc\ndef", 0u8);
    let log = Arc::new(Mutex::new(UndoLog::default()));
    let sink = Arc::clone(&log);
    doc.subscribe_plain(move |change| sink.lock().unwrap().record(change));

    doc.insert_text(0, "1").unwrap();
    doc.insert_text(6, "2").unwrap();
    assert_eq!(log.lock().unwrap().changes.len(), 2);

    undo(&mut doc, &log);
    undo(&mut doc, &log);
    assert_eq!(doc.text(), "abc\ndef");
}

#[test]
fn test_changes_arrive_in_commit_order_exactly_once() {
    let mut doc = EditableStyledDocument::new(0u8);
    let positions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&positions);
    doc.subscribe_rich(move |change| sink.lock().unwrap().push(change.position()));

    doc.insert_text(0, "hello world").unwrap();
    doc.set_style(6, 11, 1).unwrap();
    doc.replace(0, 5, &StyledDocument::from_text("HELLO", 2)).unwrap();
    doc.delete_text(5, 11).unwrap();

    assert_eq!(*positions.lock().unwrap(), vec![0, 6, 0, 5]);
    assert_eq!(doc.version(), 4);
}

#[test]
fn test_style_edits_do_not_reach_plain_subscribers() {
    let mut doc = EditableStyledDocument::with_text("abc", 0u8);
    let plain = Arc::new(Mutex::new(0));
    let paragraphs = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&plain);
    doc.subscribe_plain(move |_| *sink.lock().unwrap() += 1);
    let sink = Arc::clone(&paragraphs);
    doc.subscribe_paragraphs(move |_| *sink.lock().unwrap() += 1);

    doc.set_style(0, 3, 1).unwrap();
    doc.set_paragraph_style(0, 2).unwrap();
    doc.clear_paragraph_style(0).unwrap();
    assert_eq!(*plain.lock().unwrap(), 0);
    assert_eq!(*paragraphs.lock().unwrap(), 0);
    assert_eq!(doc.version(), 3);
}

#[test]
fn test_paragraph_changes_describe_splices() {
    let mut doc = EditableStyledDocument::with_text("one\ntwo\nthree", 0u8);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    doc.subscribe_paragraphs(move |change| sink.lock().unwrap().push(*change));

    // Typing inside a line replaces that line.
    doc.insert_text(5, "w").unwrap();
    // Joining two lines.
    doc.delete_text(3, 4).unwrap();
    // Splitting one line into three.
    doc.insert_text(2, "\n\n").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ParagraphChange { index: 1, removed: 1, added: 1 },
            ParagraphChange { index: 0, removed: 2, added: 1 },
            ParagraphChange { index: 0, removed: 1, added: 3 },
        ]
    );
    assert_eq!(doc.text(), "on\n\netwwo\nthree");
}

#[test]
fn test_update_indicator_depth_marks_replays() {
    let mut doc = EditableStyledDocument::with_text("abc", 0u8);
    let indicator = doc.being_updated().clone();
    let depths = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&depths);
    doc.subscribe_plain(move |_| sink.lock().unwrap().push(indicator.depth()));

    let change = doc.insert_text(3, "d").unwrap();
    {
        // A collaborator replaying history holds its own guard around the edit.
        let _replay = doc.being_updated().on();
        doc.apply_plain_change(&change.invert()).unwrap();
    }

    assert_eq!(*depths.lock().unwrap(), vec![1, 2]);
    assert!(!doc.is_being_updated());
    assert_eq!(doc.text(), "abc");
}

#[test]
fn test_failed_edit_notifies_nobody() {
    let mut doc = EditableStyledDocument::with_text("abc", 0u8);
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    doc.subscribe_rich(move |_| *sink.lock().unwrap() += 1);

    assert!(doc.replace_text(2, 9, "x").is_err());
    assert!(doc.set_style(4, 4, 1).is_err());
    assert_eq!(*count.lock().unwrap(), 0);
    assert!(!doc.has_changed_since(0));
    assert!(!doc.is_being_updated());
}
