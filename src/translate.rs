// src/translate.rs - Per-line translation oracles and the caching wrapper

use crate::node::LINE_DELIMITER;
use lru::LruCache;
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("no mapping for {ch:?} at column {column}")]
    Unmapped { ch: char, column: usize },
    #[error("translation failed: {0}")]
    Failed(String),
}

/// External per-line transformation.
///
/// `line` is one whole line, trailing delimiter included. `hint_capacity` is
/// a sizing hint for the output and carries no other meaning.
pub trait Translator {
    fn forward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError>;
    fn backward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn forward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError> {
        (**self).forward(line, hint_capacity)
    }

    fn backward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError> {
        (**self).backward(line, hint_capacity)
    }
}

/// Which way a line travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Source to derived.
    Forward,
    /// Derived to source.
    Backward,
}

impl Direction {
    pub fn translate<T: Translator + ?Sized>(
        self,
        translator: &mut T,
        line: &str,
        hint_capacity: usize,
    ) -> Result<String, TranslateError> {
        match self {
            Direction::Forward => translator.forward(line, hint_capacity),
            Direction::Backward => translator.backward(line, hint_capacity),
        }
    }
}

/// Output-size hint handed to the translator: `len * multiplier`, never
/// below `minimum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintPolicy {
    pub multiplier: usize,
    pub minimum: usize,
}

impl Default for HintPolicy {
    fn default() -> Self {
        Self {
            multiplier: 5,
            minimum: 0x100,
        }
    }
}

impl HintPolicy {
    pub fn capacity_for(&self, len: usize) -> usize {
        len.saturating_mul(self.multiplier).max(self.minimum)
    }
}

/// Passes every line through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Translator for Identity {
    fn forward(&mut self, line: &str, _hint_capacity: usize) -> Result<String, TranslateError> {
        Ok(line.to_owned())
    }

    fn backward(&mut self, line: &str, _hint_capacity: usize) -> Result<String, TranslateError> {
        Ok(line.to_owned())
    }
}

const BRAILLE_BASE: u32 = 0x2800;

// Braille ASCII, ordered by six-dot cell pattern (bit 0 = dot 1 ... bit 5 = dot 6).
const BRAILLE_ASCII: &[u8; 64] =
    b" A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

/// North American Braille ASCII to six-dot Unicode braille cells and back.
///
/// Forward is case-insensitive; backward yields lowercase letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiBraille;

impl AsciiBraille {
    fn cell(ch: char) -> Option<char> {
        let upper = ch.to_ascii_uppercase();
        let pattern = BRAILLE_ASCII.iter().position(|&b| b as char == upper)?;
        char::from_u32(BRAILLE_BASE + pattern as u32)
    }

    fn ascii(cell: char) -> Option<char> {
        let pattern = (cell as u32).checked_sub(BRAILLE_BASE)?;
        let byte = BRAILLE_ASCII.get(pattern as usize)?;
        Some((*byte as char).to_ascii_lowercase())
    }
}

impl Translator for AsciiBraille {
    fn forward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError> {
        let mut out = String::with_capacity(hint_capacity);
        for (column, ch) in line.chars().enumerate() {
            if ch == LINE_DELIMITER {
                out.push(ch);
                continue;
            }
            out.push(Self::cell(ch).ok_or(TranslateError::Unmapped { ch, column })?);
        }
        Ok(out)
    }

    fn backward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError> {
        let mut out = String::with_capacity(hint_capacity);
        for (column, ch) in line.chars().enumerate() {
            match ch {
                LINE_DELIMITER | ' ' => out.push(ch),
                _ => out.push(Self::ascii(ch).ok_or(TranslateError::Unmapped { ch, column })?),
            }
        }
        Ok(out)
    }
}

/// Memoises successful translations per direction, keyed by line text.
pub struct CachedTranslator<T> {
    inner: T,
    forward: LruCache<String, String>,
    backward: LruCache<String, String>,
}

impl<T: fmt::Debug> fmt::Debug for CachedTranslator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedTranslator")
            .field("inner", &self.inner)
            .field("forward", &self.forward.len())
            .field("backward", &self.backward.len())
            .finish()
    }
}

impl<T> CachedTranslator<T> {
    pub fn new(inner: T, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            forward: LruCache::new(capacity),
            backward: LruCache::new(capacity),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}

fn cached<F>(cache: &mut LruCache<String, String>, line: &str, translate: F) -> Result<String, TranslateError>
where
    F: FnOnce() -> Result<String, TranslateError>,
{
    if let Some(hit) = cache.get(line) {
        return Ok(hit.clone());
    }
    let out = translate()?;
    cache.put(line.to_owned(), out.clone());
    Ok(out)
}

impl<T: Translator> Translator for CachedTranslator<T> {
    fn forward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError> {
        let inner = &mut self.inner;
        cached(&mut self.forward, line, || inner.forward(line, hint_capacity))
    }

    fn backward(&mut self, line: &str, hint_capacity: usize) -> Result<String, TranslateError> {
        let inner = &mut self.inner;
        cached(&mut self.backward, line, || inner.backward(line, hint_capacity))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown translation table {0:?} (expected `identity` or `ascii-braille`)")]
pub struct UnknownTable(pub String);

/// Built-in translation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Table {
    Identity,
    #[default]
    AsciiBraille,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Identity => "identity",
            Table::AsciiBraille => "ascii-braille",
        }
    }

    /// Boxed translator for this table, wrapped in a cache when `cache` is set.
    pub fn build(self, cache: Option<NonZeroUsize>) -> Box<dyn Translator> {
        match (self, cache) {
            (Table::Identity, None) => Box::new(Identity),
            (Table::Identity, Some(capacity)) => Box::new(CachedTranslator::new(Identity, capacity)),
            (Table::AsciiBraille, None) => Box::new(AsciiBraille),
            (Table::AsciiBraille, Some(capacity)) => {
                Box::new(CachedTranslator::new(AsciiBraille, capacity))
            }
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(Table::Identity),
            "ascii-braille" | "braille" => Ok(Table::AsciiBraille),
            other => Err(UnknownTable(other.to_string())),
        }
    }
}
