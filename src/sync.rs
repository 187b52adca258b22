// src/sync.rs - Regenerate the opposite buffer's stale lines after an edit

use crate::buffer::{Buffer, ChangeDescriptor, LinkedChange};
use crate::node::{LINE_DELIMITER, LineStore};
use crate::translate::{Direction, HintPolicy, Translator};
use log::{debug, warn};
use std::ops::RangeInclusive;

/// Repair `target` after `change` landed in `edited`.
///
/// Lines `change.line_index ..= change.line_index + lines_added` of the
/// edited buffer are translated and written over the opposite span of
/// `target` through its detached replace, so `target` never marks anything
/// and nothing propagates back. Returns `None` when no opposite line was
/// marked.
pub fn propagate<T: Translator + ?Sized>(
    change: &LinkedChange,
    edited: &LineStore,
    target: &mut Buffer,
    translator: &mut T,
    direction: Direction,
    hints: HintPolicy,
) -> Option<ChangeDescriptor> {
    let span = change.opposite?;
    let lines = change.change.line_index..=change.change.last_line();
    debug!(
        "{direction:?}: regenerating lines {}..={} over {}..{}",
        lines.start(),
        lines.end(),
        span.offset,
        span.offset + span.length
    );

    let text = regenerate(edited, lines, translator, direction, hints);
    let applied = target.replace_text_range(span.offset, span.length, &text);
    if applied.is_noop() {
        // nothing was rewritten, so no offset pass cleared the marks
        target.store_mut().clear_marks(span.first_line..=span.last_line);
    }
    Some(applied)
}

/// Translate each line of `lines` and concatenate the results.
///
/// Empty lines produce nothing and a bare delimiter is copied without
/// consulting the translator. A failed line degrades to its delimiter, or
/// to nothing when it had none.
pub fn regenerate<T: Translator + ?Sized>(
    store: &LineStore,
    lines: RangeInclusive<usize>,
    translator: &mut T,
    direction: Direction,
    hints: HintPolicy,
) -> String {
    let mut out = String::new();
    for index in lines {
        let node = store.node(index);
        let text = node.text();
        if text.is_empty() {
            continue;
        }
        if node.len() == 1 && node.is_terminated() {
            out.push(LINE_DELIMITER);
            continue;
        }

        let terminated = node.is_terminated();
        match direction.translate(translator, text, hints.capacity_for(node.len())) {
            Ok(result) => out.push_str(&conform(result, terminated)),
            Err(err) => {
                warn!("{direction:?} translation of line {index} failed: {err}");
                if terminated {
                    out.push(LINE_DELIMITER);
                }
            }
        }
    }
    out
}

/// Force a translated line into the shape of the line it came from: no
/// interior delimiters, trailing delimiter only if the original had one.
fn conform(output: String, terminated: bool) -> String {
    let body = output.strip_suffix(LINE_DELIMITER).unwrap_or(&output);
    if !body.contains(LINE_DELIMITER) && output.ends_with(LINE_DELIMITER) == terminated {
        return output;
    }
    warn!("translator changed the line structure of {output:?}; conforming it");
    let mut line = body.replace(LINE_DELIMITER, " ");
    if terminated {
        line.push(LINE_DELIMITER);
    }
    line
}
