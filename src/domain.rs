//! Domain models for website documents.
//!
//! This module contains the in-memory document tree, its sections and the
//! editor configuration. Nothing here touches the filesystem except
//! [`Config::load`] and [`Config::save`].

mod config;
pub use config::Config;

/// The document tree and its structural operations.
pub mod document;
pub use document::{Document, MoveError, Position, SectionKind};

mod section;
pub use section::{ContentEdit, ContentSection, GroupSection};
