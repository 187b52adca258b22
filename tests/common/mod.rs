// Common test utilities: translator stubs and invariant checks
#![allow(dead_code)]

use janus::{Buffer, DualBuffer, Side, TextContent, TranslateError, Translator};

/// Upper-cases forward, lower-cases backward, and records every line it was
/// asked to translate.
#[derive(Debug, Default)]
pub struct Recording {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
}

impl Recording {
    pub fn calls(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}

impl Translator for Recording {
    fn forward(&mut self, line: &str, _hint_capacity: usize) -> Result<String, TranslateError> {
        self.forward.push(line.to_string());
        Ok(line.to_uppercase())
    }

    fn backward(&mut self, line: &str, _hint_capacity: usize) -> Result<String, TranslateError> {
        self.backward.push(line.to_string());
        Ok(line.to_lowercase())
    }
}

/// Fails every line, counting attempts.
#[derive(Debug, Default)]
pub struct AlwaysFails {
    pub attempts: usize,
}

impl Translator for AlwaysFails {
    fn forward(&mut self, line: &str, _hint_capacity: usize) -> Result<String, TranslateError> {
        self.attempts += 1;
        Err(TranslateError::Failed(format!("cannot translate {line:?}")))
    }

    fn backward(&mut self, line: &str, _hint_capacity: usize) -> Result<String, TranslateError> {
        self.attempts += 1;
        Err(TranslateError::Failed(format!("cannot translate {line:?}")))
    }
}

/// Assert the offset chain and line shape of one buffer.
pub fn assert_buffer_invariants(buffer: &Buffer) {
    if let Err(problem) = buffer.store().check_invariants() {
        panic!("buffer invariant broken: {problem}\n{:#?}", buffer.store());
    }
    assert!(buffer.line_count() >= 1, "Buffer must have at least 1 line");
}

/// Assert both buffers are well formed, index-aligned and free of marks.
pub fn assert_synchronized<T: Translator>(dual: &DualBuffer<T>) {
    assert_buffer_invariants(dual.source());
    assert_buffer_invariants(dual.derived());
    assert_eq!(
        dual.source().line_count(),
        dual.derived().line_count(),
        "source {:?} and derived {:?} are not line-aligned",
        dual.source().text(),
        dual.derived().text()
    );
    for side in [Side::Source, Side::Derived] {
        assert!(
            !dual.side(side).store().has_marks(),
            "{side:?} buffer still carries dirty/deleted marks"
        );
    }
}
