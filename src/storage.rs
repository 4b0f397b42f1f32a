pub mod editor;
/// XML encoding of documents.
pub mod xml;
mod source;

pub use editor::{Editor, LoadError, SaveError};
pub use source::{FileSource, MemorySource, Source};
pub use xml::{ParseError, RenderError};
