// src/content.rs - Source/derived buffer pair kept in step by a translator

use crate::buffer::{Buffer, ChangeDescriptor};
use crate::notify::{ChangeListener, ListenerId, TextContent};
use crate::sync;
use crate::translate::{Direction, HintPolicy, Translator};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Derived,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Source => Side::Derived,
            Side::Derived => Side::Source,
        }
    }

    /// Direction in which edits made on this side travel.
    pub fn direction(self) -> Direction {
        match self {
            Side::Source => Direction::Forward,
            Side::Derived => Direction::Backward,
        }
    }
}

/// Two index-aligned buffers. Line `i` of the derived buffer is the
/// translation of line `i` of the source buffer, and the other way round
/// for edits made on the derived side.
#[derive(Debug)]
pub struct DualBuffer<T> {
    source: Buffer,
    derived: Buffer,
    translator: T,
    hints: HintPolicy,
}

impl<T: Translator> DualBuffer<T> {
    pub fn new(translator: T) -> Self {
        Self {
            source: Buffer::new(),
            derived: Buffer::new(),
            translator,
            hints: HintPolicy::default(),
        }
    }

    pub fn with_hint_policy(mut self, hints: HintPolicy) -> Self {
        self.hints = hints;
        self
    }

    pub fn hint_policy(&self) -> HintPolicy {
        self.hints
    }

    pub fn source(&self) -> &Buffer {
        &self.source
    }

    pub fn derived(&self) -> &Buffer {
        &self.derived
    }

    pub fn side(&self, side: Side) -> &Buffer {
        match side {
            Side::Source => &self.source,
            Side::Derived => &self.derived,
        }
    }

    /// Editing handle for one side, for a widget bound to that buffer.
    pub fn side_mut(&mut self, side: Side) -> SideMut<'_, T> {
        SideMut { dual: self, side }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn translator_mut(&mut self) -> &mut T {
        &mut self.translator
    }

    /// Edit `side` and bring the other side up to date.
    pub fn replace_text_range(
        &mut self,
        side: Side,
        start: usize,
        replace_length: usize,
        text: &str,
    ) -> ChangeDescriptor {
        let (edited, opposite) = match side {
            Side::Source => (&mut self.source, &mut self.derived),
            Side::Derived => (&mut self.derived, &mut self.source),
        };
        let linked = edited.replace_text_range_linked(start, replace_length, text, opposite.store_mut());
        let applied = sync::propagate(
            &linked,
            edited.store(),
            opposite,
            &mut self.translator,
            side.direction(),
            self.hints,
        );
        if let Some(applied) = applied {
            trace!("{side:?} edit regenerated {:?} span: {applied:?}", side.opposite());
        }
        linked.change
    }

    pub fn set_text(&mut self, side: Side, text: &str) -> ChangeDescriptor {
        let count = self.side(side).char_count();
        self.replace_text_range(side, 0, count, text)
    }

    pub fn add_listener(&mut self, side: Side, listener: Box<dyn ChangeListener>) -> ListenerId {
        match side {
            Side::Source => self.source.add_listener(listener),
            Side::Derived => self.derived.add_listener(listener),
        }
    }

    pub fn remove_listener(&mut self, side: Side, id: ListenerId) -> Option<Box<dyn ChangeListener>> {
        match side {
            Side::Source => self.source.remove_listener(id),
            Side::Derived => self.derived.remove_listener(id),
        }
    }
}

/// One side of a [`DualBuffer`] seen as a plain editable text content.
pub struct SideMut<'a, T> {
    dual: &'a mut DualBuffer<T>,
    side: Side,
}

impl<T: Translator> SideMut<'_, T> {
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn text(&self) -> String {
        self.dual.side(self.side).text()
    }

    pub fn replace_text_range(&mut self, start: usize, replace_length: usize, text: &str) -> ChangeDescriptor {
        self.dual.replace_text_range(self.side, start, replace_length, text)
    }

    pub fn set_text(&mut self, text: &str) -> ChangeDescriptor {
        self.dual.set_text(self.side, text)
    }

    /// Insert at `offset`, as a key-chord assembler would.
    pub fn insert(&mut self, offset: usize, text: &str) -> ChangeDescriptor {
        self.replace_text_range(offset, 0, text)
    }

    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        self.dual.add_listener(self.side, listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn ChangeListener>> {
        self.dual.remove_listener(self.side, id)
    }
}

impl<T: Translator> TextContent for SideMut<'_, T> {
    fn char_count(&self) -> usize {
        self.dual.side(self.side).char_count()
    }

    fn line_count(&self) -> usize {
        self.dual.side(self.side).line_count()
    }

    fn line(&self, index: usize) -> &str {
        self.dual.side(self.side).line(index)
    }

    fn line_at_offset(&self, offset: usize) -> usize {
        self.dual.side(self.side).line_at_offset(offset)
    }

    fn offset_at_line(&self, index: usize) -> usize {
        self.dual.side(self.side).offset_at_line(index)
    }

    fn text_range(&self, start: usize, length: usize) -> String {
        self.dual.side(self.side).text_range(start, length)
    }
}
