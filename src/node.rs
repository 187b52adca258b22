// src/node.rs - Line-node store: per-line segments with absolute char offsets

use std::ops::RangeInclusive;

/// The only line delimiter the store recognises. A carriage return is
/// ordinary line content.
pub const LINE_DELIMITER: char = '\n';

/// One logical line of a buffer.
///
/// `text` keeps its trailing delimiter unless the node is the final line.
/// Offsets and lengths count chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineNode {
    text: String,
    len: usize,
    offset: usize,
    dirty: bool,
    deleted: bool,
}

impl LineNode {
    fn new(text: String) -> Self {
        let len = text.chars().count();
        Self {
            text,
            len,
            offset: 0,
            dirty: false,
            deleted: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars, delimiter included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset one past the node's last char.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_marked(&self) -> bool {
        self.dirty || self.deleted
    }

    pub fn is_terminated(&self) -> bool {
        self.text.ends_with(LINE_DELIMITER)
    }

    /// Line content without the trailing delimiter.
    pub fn content(&self) -> &str {
        self.text.strip_suffix(LINE_DELIMITER).unwrap_or(&self.text)
    }

    fn insert_str(&mut self, at: usize, text: &str) {
        let idx = byte_index(&self.text, at);
        self.text.insert_str(idx, text);
        self.len += text.chars().count();
    }

    fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
        self.len += text.chars().count();
    }

    fn remove(&mut self, from: usize, to: usize) {
        let start = byte_index(&self.text, from);
        let end = byte_index(&self.text, to);
        self.text.replace_range(start..end, "");
        self.len -= to - from;
    }

    /// Cut the node at `at`, returning everything after it.
    fn split_off(&mut self, at: usize) -> String {
        let idx = byte_index(&self.text, at);
        let suffix = self.text.split_off(idx);
        self.len = at;
        suffix
    }

    /// Drop everything from `at` on.
    fn truncate(&mut self, at: usize) {
        let idx = byte_index(&self.text, at);
        self.text.truncate(idx);
        self.len = at;
    }

    fn clear_marks(&mut self) {
        self.dirty = false;
        self.deleted = false;
    }
}

/// Byte index of the char at `char_idx`, or the string length when
/// `char_idx` is one past the end.
fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
}

/// Split `text` into segments that each end with the delimiter, followed by
/// the unterminated remainder when there is one.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive(LINE_DELIMITER).collect()
}

/// Number of delimiters in `text`, i.e. the number of complete lines it adds.
pub fn count_delimiters(text: &str) -> usize {
    text.matches(LINE_DELIMITER).count()
}

/// Ordered line segments of one buffer.
///
/// Always holds at least one node. Every node but the last ends with exactly
/// one delimiter; the last holds none and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStore {
    nodes: Vec<LineNode>,
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore {
    pub fn new() -> Self {
        Self {
            nodes: vec![LineNode::default()],
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut store = Self::new();
        store.insert_text(text, 0, None);
        store
    }

    pub fn nodes(&self) -> &[LineNode] {
        &self.nodes
    }

    /// Node at `index`. Panics when the line does not exist.
    pub fn node(&self, index: usize) -> &LineNode {
        let count = self.nodes.len();
        self.nodes
            .get(index)
            .unwrap_or_else(|| panic!("line {index} out of range ({count} lines)"))
    }

    pub fn char_count(&self) -> usize {
        self.last().end()
    }

    pub fn line_count(&self) -> usize {
        self.nodes.len().max(1)
    }

    /// Index of the line containing `offset`. The one-past-end offset maps to
    /// the final line.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        let count = self.char_count();
        assert!(
            offset <= count,
            "offset {offset} is past the end of the buffer ({count} chars)"
        );
        let index = self.nodes.partition_point(|node| node.end() <= offset);
        index.min(self.nodes.len() - 1)
    }

    /// Offset of line `index`, or `char_count()` for any index past the end.
    pub fn offset_at_line(&self, index: usize) -> usize {
        match self.nodes.get(index) {
            Some(node) => node.offset,
            None => self.char_count(),
        }
    }

    /// Line text without its delimiter; empty past the end.
    pub fn line(&self, index: usize) -> &str {
        self.nodes.get(index).map_or("", LineNode::content)
    }

    /// Text of `[start, start + length)`.
    pub fn text_range(&self, start: usize, length: usize) -> String {
        if length == 0 {
            return String::new();
        }
        let count = self.char_count();
        let end = start
            .checked_add(length)
            .filter(|&end| end <= count)
            .unwrap_or_else(|| {
                panic!("range {start}+{length} is past the end of the buffer ({count} chars)")
            });

        let first = self.line_at_offset(start);
        let last = self.line_at_offset(end - 1);
        let mut text = String::with_capacity(length);
        for node in &self.nodes[first..=last] {
            let from = start.saturating_sub(node.offset);
            let to = (end - node.offset).min(node.len);
            let (from, to) = (byte_index(&node.text, from), byte_index(&node.text, to));
            text.push_str(&node.text[from..to]);
        }
        text
    }

    /// The whole buffer as one string.
    pub fn text(&self) -> String {
        self.nodes.iter().map(LineNode::text).collect()
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(LineNode::is_marked)
    }

    pub fn has_marks(&self) -> bool {
        self.nodes.iter().any(LineNode::is_marked)
    }

    fn last(&self) -> &LineNode {
        // never empty
        &self.nodes[self.nodes.len() - 1]
    }

    fn counterpart(&mut self, index: usize) -> &mut LineNode {
        let count = self.nodes.len();
        self.nodes
            .get_mut(index)
            .unwrap_or_else(|| panic!("line {index} has no counterpart ({count} lines)"))
    }

    pub(crate) fn mark_dirty(&mut self, index: usize) {
        self.counterpart(index).dirty = true;
    }

    pub(crate) fn mark_deleted(&mut self, index: usize) {
        self.counterpart(index).deleted = true;
    }

    /// Clear the flags on `lines` without touching text or offsets.
    pub(crate) fn clear_marks(&mut self, lines: RangeInclusive<usize>) {
        let end = (*lines.end()).min(self.nodes.len().saturating_sub(1));
        for node in self.nodes.iter_mut().take(end + 1).skip(*lines.start()) {
            node.clear_marks();
        }
    }

    /// Recompute offsets from `index` to the end, clearing flags on every
    /// node visited. The offset of `index` itself is taken as settled.
    fn reset_offsets_from(&mut self, index: usize) {
        let index = index.min(self.nodes.len() - 1);
        if index == 0 {
            self.nodes[0].offset = 0;
        }
        let mut next = self.nodes[index].offset;
        for node in &mut self.nodes[index..] {
            node.offset = next;
            node.clear_marks();
            next += node.len;
        }
    }

    /// Remove `[start, start + length)`.
    ///
    /// With `marks`, the opposite store's start line is flagged dirty and the
    /// counterpart of every removed line is flagged deleted.
    pub fn delete_range(&mut self, start: usize, length: usize, marks: Option<&mut LineStore>) {
        if length == 0 {
            return;
        }
        let count = self.char_count();
        let end = start
            .checked_add(length)
            .filter(|&end| end <= count)
            .unwrap_or_else(|| {
                panic!("delete {start}+{length} is past the end of the buffer ({count} chars)")
            });

        let first = self.line_at_offset(start);
        let last = self.line_at_offset(end);

        if first == last {
            let node = &mut self.nodes[first];
            let offset = node.offset;
            node.remove(start - offset, end - offset);
            self.reset_offsets_from(first);
            if let Some(marks) = marks {
                marks.mark_dirty(first);
            }
            return;
        }

        let tail = {
            let node = &mut self.nodes[last];
            let at = end - node.offset;
            node.split_off(at)
        };
        let head = &mut self.nodes[first];
        let at = start - head.offset;
        head.truncate(at);
        head.push_str(&tail);
        self.nodes.drain(first + 1..=last);
        self.reset_offsets_from(first.saturating_sub(1));

        if let Some(marks) = marks {
            marks.mark_dirty(first);
            for index in first + 1..=last {
                marks.mark_deleted(index);
            }
        }
    }

    /// Insert `text` at `offset`.
    ///
    /// Text without a delimiter is spliced into the line in place. Otherwise
    /// the line keeps its prefix plus the first segment, interior segments
    /// become new lines, and the trailing partial segment joins the original
    /// suffix as the last new line. With `marks`, the opposite store's line at
    /// `offset` is flagged dirty.
    pub fn insert_text(&mut self, text: &str, offset: usize, marks: Option<&mut LineStore>) {
        if text.is_empty() {
            return;
        }
        let index = self.line_at_offset(offset);
        let at = offset - self.nodes[index].offset;

        if !text.contains(LINE_DELIMITER) {
            self.nodes[index].insert_str(at, text);
            self.reset_offsets_from(index);
        } else {
            let suffix = self.nodes[index].split_off(at);
            let mut segments = split_lines(text);
            let partial = if text.ends_with(LINE_DELIMITER) {
                None
            } else {
                segments.pop()
            };

            let mut segments = segments.into_iter();
            if let Some(first) = segments.next() {
                self.nodes[index].push_str(first);
            }
            let mut added: Vec<LineNode> = segments.map(|s| LineNode::new(s.to_owned())).collect();
            let mut last = partial.unwrap_or_default().to_owned();
            last.push_str(&suffix);
            added.push(LineNode::new(last));

            self.nodes.splice(index + 1..index + 1, added);
            self.reset_offsets_from(index.saturating_sub(1));
        }

        if let Some(marks) = marks {
            marks.mark_dirty(index);
        }
    }

    /// Verify the offset chain and line shape.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("store has no lines".to_string());
        }
        if self.nodes[0].offset != 0 {
            return Err(format!("first line starts at {}", self.nodes[0].offset));
        }
        let last = self.nodes.len() - 1;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.len != node.text.chars().count() {
                return Err(format!("line {i} caches length {} for {:?}", node.len, node.text));
            }
            let delimiters = count_delimiters(&node.text);
            if i < last && (delimiters != 1 || !node.is_terminated()) {
                return Err(format!("line {i} is not a single terminated line: {:?}", node.text));
            }
            if i == last && delimiters != 0 {
                return Err(format!("final line contains a delimiter: {:?}", node.text));
            }
            if let Some(next) = self.nodes.get(i + 1) {
                if node.end() != next.offset {
                    return Err(format!(
                        "line {} starts at {} but line {i} ends at {}",
                        i + 1,
                        next.offset,
                        node.end()
                    ));
                }
            }
        }
        Ok(())
    }
}
