// src/notify.rs - Two-phase change notification for editor widgets

use crate::node::LineStore;
use std::fmt;

/// Read-only view of one buffer, as an editor widget sees it.
pub trait TextContent {
    fn char_count(&self) -> usize;
    fn line_count(&self) -> usize;
    /// Line text without its delimiter; empty past the end.
    fn line(&self, index: usize) -> &str;
    fn line_at_offset(&self, offset: usize) -> usize;
    fn offset_at_line(&self, index: usize) -> usize;
    fn text_range(&self, start: usize, length: usize) -> String;

    fn line_delimiter(&self) -> &str {
        "\n"
    }
}

impl TextContent for LineStore {
    fn char_count(&self) -> usize {
        LineStore::char_count(self)
    }

    fn line_count(&self) -> usize {
        LineStore::line_count(self)
    }

    fn line(&self, index: usize) -> &str {
        LineStore::line(self, index)
    }

    fn line_at_offset(&self, offset: usize) -> usize {
        LineStore::line_at_offset(self, offset)
    }

    fn offset_at_line(&self, index: usize) -> usize {
        LineStore::offset_at_line(self, index)
    }

    fn text_range(&self, start: usize, length: usize) -> String {
        LineStore::text_range(self, start, length)
    }
}

/// Sent before a buffer is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChanging<'a> {
    pub start: usize,
    pub replace_char_count: usize,
    pub replace_line_count: usize,
    pub new_char_count: usize,
    pub new_line_count: usize,
    pub new_text: &'a str,
}

/// Sent once a mutation has landed and offsets are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChanged {
    pub start: usize,
    pub new_char_count: usize,
}

/// Pre/post edit callbacks. Both receive the buffer so consumers can read
/// the consistent state before and after the edit.
pub trait ChangeListener {
    fn text_changing(&mut self, content: &dyn TextContent, event: &TextChanging<'_>);
    fn text_changed(&mut self, content: &dyn TextContent, event: &TextChanged);
}

/// Listener built from a pair of closures.
pub struct FnListener<P, Q> {
    changing: P,
    changed: Q,
}

pub fn listener_fn<P, Q>(changing: P, changed: Q) -> FnListener<P, Q>
where
    P: FnMut(&dyn TextContent, &TextChanging<'_>),
    Q: FnMut(&dyn TextContent, &TextChanged),
{
    FnListener { changing, changed }
}

impl<P, Q> ChangeListener for FnListener<P, Q>
where
    P: FnMut(&dyn TextContent, &TextChanging<'_>),
    Q: FnMut(&dyn TextContent, &TextChanged),
{
    fn text_changing(&mut self, content: &dyn TextContent, event: &TextChanging<'_>) {
        (self.changing)(content, event)
    }

    fn text_changed(&mut self, content: &dyn TextContent, event: &TextChanged) {
        (self.changed)(content, event)
    }
}

pub type ListenerId = usize;

/// Registered listeners of one buffer, in registration order. The same
/// consumer may be registered more than once.
#[derive(Default)]
pub struct Listeners {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Box<dyn ChangeListener>)>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<ListenerId> = self.entries.iter().map(|(id, _)| *id).collect();
        f.debug_struct("Listeners").field("ids", &ids).finish()
    }
}

impl Listeners {
    pub fn add(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> Option<Box<dyn ChangeListener>> {
        let index = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn changing(&mut self, content: &dyn TextContent, event: &TextChanging<'_>) {
        for (_, listener) in &mut self.entries {
            listener.text_changing(content, event);
        }
    }

    pub(crate) fn changed(&mut self, content: &dyn TextContent, event: &TextChanged) {
        for (_, listener) in &mut self.entries {
            listener.text_changed(content, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn ChangeListener> {
        let pre = Rc::clone(log);
        let post = Rc::clone(log);
        Box::new(listener_fn(
            move |_, event: &TextChanging<'_>| {
                pre.borrow_mut().push(format!("{name}:changing@{}", event.start))
            },
            move |_, event: &TextChanged| {
                post.borrow_mut().push(format!("{name}:changed@{}", event.start))
            },
        ))
    }

    fn fire(listeners: &mut Listeners, store: &LineStore) {
        let event = TextChanging {
            start: 1,
            replace_char_count: 0,
            replace_line_count: 0,
            new_char_count: 1,
            new_line_count: 0,
            new_text: "x",
        };
        listeners.changing(store, &event);
        listeners.changed(
            store,
            &TextChanged {
                start: 1,
                new_char_count: 1,
            },
        );
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        listeners.add(recorder("a", &log));
        listeners.add(recorder("b", &log));
        fire(&mut listeners, &LineStore::new());
        assert_eq!(
            *log.borrow(),
            vec!["a:changing@1", "b:changing@1", "a:changed@1", "b:changed@1"]
        );
    }

    #[test]
    fn test_duplicate_registration_is_kept() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        let first = listeners.add(recorder("a", &log));
        let second = listeners.add(recorder("a", &log));
        assert_ne!(first, second);
        assert_eq!(listeners.len(), 2);
        fire(&mut listeners, &LineStore::new());
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn test_remove_listener() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        let a = listeners.add(recorder("a", &log));
        listeners.add(recorder("b", &log));
        assert!(listeners.remove(a).is_some());
        assert!(listeners.remove(a).is_none());
        fire(&mut listeners, &LineStore::new());
        assert_eq!(*log.borrow(), vec!["b:changing@1", "b:changed@1"]);
    }

    #[test]
    fn test_default_line_delimiter() {
        let store = LineStore::from_text("a\nb");
        let content: &dyn TextContent = &store;
        assert_eq!(content.line_delimiter(), "\n");
        assert_eq!(content.line(1), "b");
    }
}
