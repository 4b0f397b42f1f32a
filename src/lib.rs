//! Grouped website document editing
//!
//! A website document is an ordered list of named groups, each holding an
//! ordered list of link entries. The document lives in an XML file and is
//! edited in memory until it is explicitly saved or discarded.

pub mod domain;
pub use domain::{
    Config, ContentEdit, ContentSection, Document, GroupSection, MoveError, Position, SectionKind,
};

/// Persistence of documents: sources, the XML codec and the editor.
pub mod storage;
pub use storage::{Editor, FileSource, LoadError, MemorySource, ParseError, SaveError, Source};
