// src/buffer.rs - Buffer façade: line-oriented edits with change notification

use crate::node::{LineStore, count_delimiters};
use crate::notify::{ChangeListener, ListenerId, Listeners, TextChanged, TextChanging, TextContent};
use log::trace;

/// What one edit did to the buffer it was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeDescriptor {
    /// Char offset where the edit starts.
    pub offset: usize,
    /// Chars inserted.
    pub length: usize,
    /// Chars removed.
    pub replaced_length: usize,
    /// Line containing `offset` before the edit.
    pub line_index: usize,
    /// Line boundaries crossed by the removed range.
    pub replaced_lines: usize,
    /// Complete lines in the inserted text.
    pub lines_added: usize,
}

impl ChangeDescriptor {
    pub fn is_noop(&self) -> bool {
        self.length == 0 && self.replaced_length == 0
    }

    /// Last line of the edited buffer touched by the inserted text.
    pub fn last_line(&self) -> usize {
        self.line_index + self.lines_added
    }
}

/// Char range of the opposite buffer covering the lines that correspond to
/// the replaced lines of a linked edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OppositeSpan {
    pub offset: usize,
    pub length: usize,
    pub first_line: usize,
    pub last_line: usize,
}

impl OppositeSpan {
    fn covering(store: &LineStore, first_line: usize, last_line: usize) -> Self {
        let offset = store.node(first_line).offset();
        let end = store.node(last_line).end();
        Self {
            offset,
            length: end - offset,
            first_line,
            last_line,
        }
    }
}

/// Result of an edit that cross-marked the opposite store.
///
/// `opposite` is `None` when no opposite line was marked, in which case
/// there is nothing to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedChange {
    pub change: ChangeDescriptor,
    pub opposite: Option<OppositeSpan>,
}

/// One side of the dual buffer: a line store plus its listeners.
#[derive(Debug, Default)]
pub struct Buffer {
    store: LineStore,
    listeners: Listeners,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut LineStore {
        &mut self.store
    }

    /// The whole buffer as one string.
    pub fn text(&self) -> String {
        self.store.text()
    }

    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn ChangeListener>> {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Replace `[start, start + replace_length)` with `text`.
    ///
    /// Nothing outside this buffer is touched, so an edit made through here
    /// never schedules further propagation.
    pub fn replace_text_range(&mut self, start: usize, replace_length: usize, text: &str) -> ChangeDescriptor {
        self.replace(start, replace_length, text, None)
    }

    /// Replace `[start, start + replace_length)` with `text`, flagging the
    /// affected lines of `opposite` dirty or deleted.
    pub fn replace_text_range_linked(
        &mut self,
        start: usize,
        replace_length: usize,
        text: &str,
        opposite: &mut LineStore,
    ) -> LinkedChange {
        let change = self.replace(start, replace_length, text, Some(&mut *opposite));
        let span = (!change.is_noop() && opposite.is_marked(change.line_index)).then(|| {
            OppositeSpan::covering(
                opposite,
                change.line_index,
                change.line_index + change.replaced_lines,
            )
        });
        LinkedChange {
            change,
            opposite: span,
        }
    }

    pub fn set_text(&mut self, text: &str) -> ChangeDescriptor {
        let count = self.store.char_count();
        self.replace_text_range(0, count, text)
    }

    pub fn set_text_linked(&mut self, text: &str, opposite: &mut LineStore) -> LinkedChange {
        let count = self.store.char_count();
        self.replace_text_range_linked(0, count, text, opposite)
    }

    fn replace(
        &mut self,
        start: usize,
        replace_length: usize,
        text: &str,
        mut marks: Option<&mut LineStore>,
    ) -> ChangeDescriptor {
        let count = self.store.char_count();
        let end = start
            .checked_add(replace_length)
            .filter(|&end| end <= count)
            .unwrap_or_else(|| {
                panic!("replace {start}+{replace_length} is past the end of the buffer ({count} chars)")
            });

        let line_index = self.store.line_at_offset(start);
        let change = ChangeDescriptor {
            offset: start,
            length: text.chars().count(),
            replaced_length: replace_length,
            line_index,
            replaced_lines: self.store.line_at_offset(end) - line_index,
            lines_added: count_delimiters(text),
        };
        if change.is_noop() {
            return change;
        }
        trace!("replace {start}..{end} with {} chars: {change:?}", change.length);

        let changing = TextChanging {
            start,
            replace_char_count: replace_length,
            replace_line_count: change.replaced_lines,
            new_char_count: change.length,
            new_line_count: change.lines_added,
            new_text: text,
        };
        self.listeners.changing(&self.store, &changing);

        self.store.delete_range(start, replace_length, marks.as_deref_mut());
        self.store.insert_text(text, start, marks);
        debug_assert_eq!(self.store.check_invariants(), Ok(()));

        let changed = TextChanged {
            start,
            new_char_count: change.length,
        };
        self.listeners.changed(&self.store, &changed);
        change
    }
}

impl TextContent for Buffer {
    fn char_count(&self) -> usize {
        self.store.char_count()
    }

    fn line_count(&self) -> usize {
        self.store.line_count()
    }

    fn line(&self, index: usize) -> &str {
        self.store.line(index)
    }

    fn line_at_offset(&self, offset: usize) -> usize {
        self.store.line_at_offset(offset)
    }

    fn offset_at_line(&self, index: usize) -> usize {
        self.store.offset_at_line(index)
    }

    fn text_range(&self, start: usize, length: usize) -> String {
        self.store.text_range(start, length)
    }
}
