// lib.rs - Library root for janus

pub mod buffer;
pub mod cli;
pub mod config;
pub mod content;
pub mod node;
pub mod notify;
pub mod sync;
pub mod translate;

pub use buffer::{Buffer, ChangeDescriptor, LinkedChange, OppositeSpan};
pub use content::{DualBuffer, Side, SideMut};
pub use notify::{ChangeListener, ListenerId, TextChanged, TextChanging, TextContent, listener_fn};
pub use translate::{TranslateError, Translator};
