// Edge case scenario tests
// Boundary texts, listener contracts and multi-step sequences across both sides

mod common;
use common::{Recording, assert_buffer_invariants, assert_synchronized};

use janus::translate::{CachedTranslator, Identity};
use janus::{Buffer, DualBuffer, Side, TextChanged, TextChanging, TextContent, listener_fn};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

/// Test all queries on an empty buffer
#[test]
fn test_empty_buffer_queries() {
    let buffer = Buffer::new();
    assert_eq!(buffer.char_count(), 0);
    assert_eq!(buffer.line_count(), 1);
    assert_eq!(buffer.line(0), "");
    assert_eq!(buffer.line_at_offset(0), 0);
    assert_eq!(buffer.offset_at_line(0), 0);
    assert_eq!(buffer.text_range(0, 0), "");
    assert_eq!(buffer.line_delimiter(), "\n");
    assert_buffer_invariants(&buffer);
}

#[test]
fn test_text_ending_on_delimiter_has_empty_last_line() {
    let mut buffer = Buffer::new();
    buffer.set_text("one\ntwo\n");
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line(2), "");
    assert_eq!(buffer.offset_at_line(2), 8);
    assert_eq!(buffer.line_at_offset(8), 2);
    assert_buffer_invariants(&buffer);
}

#[test]
fn test_text_without_delimiter_is_one_line() {
    let mut buffer = Buffer::new();
    buffer.set_text("no newline here");
    assert_eq!(buffer.line_count(), 1);
    assert_eq!(buffer.line(0), "no newline here");
    assert_eq!(buffer.line_at_offset(15), 0);
}

#[test]
fn test_carriage_return_is_plain_content() {
    let mut buffer = Buffer::new();
    buffer.set_text("a\r\nb\r");
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(0), "a\r");
    assert_eq!(buffer.line(1), "b\r");
}

#[test]
fn test_offsets_count_chars_not_bytes() {
    let mut buffer = Buffer::new();
    buffer.set_text("héllo\n⠓⠑");
    assert_eq!(buffer.char_count(), 8);
    assert_eq!(buffer.offset_at_line(1), 6);
    assert_eq!(buffer.text_range(1, 4), "éllo");

    buffer.replace_text_range(7, 1, "⠇⠇");
    assert_eq!(buffer.line(1), "⠓⠇⠇");
    assert_buffer_invariants(&buffer);
}

#[test]
fn test_only_delimiters() {
    let mut dual = DualBuffer::new(Recording::default());
    dual.set_text(Side::Source, "\n\n\n");
    assert_eq!(dual.derived().text(), "\n\n\n");
    assert_eq!(dual.translator().calls(), 0);

    dual.replace_text_range(Side::Source, 1, 1, "");
    assert_eq!(dual.derived().text(), "\n\n");
    assert_synchronized(&dual);
}

#[test]
fn test_clear_both_sides() {
    let mut dual = DualBuffer::new(Recording::default());
    dual.set_text(Side::Source, "abc\ndef\nghi");
    dual.set_text(Side::Source, "");

    assert_eq!(dual.source().text(), "");
    assert_eq!(dual.derived().text(), "");
    assert_eq!(dual.derived().line_count(), 1);
    assert_synchronized(&dual);
}

#[test]
fn test_alternating_side_edits() {
    let mut dual = DualBuffer::new(Recording::default());
    dual.set_text(Side::Source, "alpha\nbeta");

    dual.replace_text_range(Side::Derived, 0, 5, "GAMMA");
    assert_eq!(dual.source().text(), "gamma\nbeta");

    dual.replace_text_range(Side::Source, 10, 0, "\ndelta");
    assert_eq!(dual.derived().text(), "GAMMA\nBETA\nDELTA");

    dual.replace_text_range(Side::Derived, 6, 5, "");
    assert_eq!(dual.source().text(), "gamma\ndelta");
    assert_synchronized(&dual);
}

#[test]
fn test_cached_translator_behind_dual_buffer() {
    let cache = NonZeroUsize::new(8).unwrap();
    let mut dual = DualBuffer::new(CachedTranslator::new(Recording::default(), cache));
    dual.set_text(Side::Source, "same\nsame\nsame");

    assert_eq!(dual.derived().text(), "SAME\nSAME\nSAME");
    // "same\n" twice from the cache, "same" once
    assert_eq!(dual.translator().inner().forward, vec!["same\n", "same"]);
    assert_synchronized(&dual);
}

#[test]
fn test_listener_sees_pre_state_then_post_state() {
    let mut dual = DualBuffer::new(Identity);
    dual.set_text(Side::Source, "one\ntwo");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let (pre, post) = (Rc::clone(&seen), Rc::clone(&seen));
    dual.add_listener(
        Side::Derived,
        Box::new(listener_fn(
            move |content: &dyn TextContent, event: &TextChanging<'_>| {
                let old = content.text_range(event.start, event.replace_char_count);
                pre.borrow_mut()
                    .push(format!("changing {old:?} -> {:?}", event.new_text));
            },
            move |content: &dyn TextContent, event: &TextChanged| {
                let new = content.text_range(event.start, event.new_char_count);
                post.borrow_mut().push(format!("changed {new:?} lines={}", content.line_count()));
            },
        )),
    );

    dual.replace_text_range(Side::Source, 4, 3, "six\nten");

    assert_eq!(
        *seen.borrow(),
        vec![
            "changing \"two\" -> \"six\\nten\"".to_string(),
            "changed \"six\\nten\" lines=3".to_string(),
        ]
    );
}

#[test]
fn test_listener_is_not_notified_for_unmarked_opposite() {
    let mut dual = DualBuffer::new(Identity);
    dual.set_text(Side::Source, "abc");

    let count = Rc::new(RefCell::new(0));
    let hits = Rc::clone(&count);
    let id = dual.add_listener(
        Side::Derived,
        Box::new(listener_fn(
            |_: &dyn TextContent, _: &TextChanging<'_>| {},
            move |_: &dyn TextContent, _: &TextChanged| *hits.borrow_mut() += 1,
        )),
    );

    dual.replace_text_range(Side::Source, 1, 0, "");
    assert_eq!(*count.borrow(), 0);

    dual.replace_text_range(Side::Source, 1, 0, "x");
    assert_eq!(*count.borrow(), 1);

    assert!(dual.remove_listener(Side::Derived, id).is_some());
    dual.replace_text_range(Side::Source, 1, 0, "y");
    assert_eq!(*count.borrow(), 1);
}
