//! An in-memory website document
//!
//! The [`Document`] knows nothing about files or XML. It is an ordered tree
//! of groups and entries, addressed by title.
//!
//! Titles are not unique. Operations that act "on every match" (adding,
//! editing, deleting and moving entries between groups) apply to all
//! matching elements and report how many were affected. Positional moves
//! need exactly one subject and one anchor, and fail with [`MoveError`]
//! otherwise, leaving the tree untouched.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{ContentEdit, ContentSection, GroupSection};

/// Root element name used when a document is created from scratch.
pub const DEFAULT_ROOT: &str = "website";

/// A website document: an ordered sequence of group sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Name of the root element in the encoded form.
    #[serde(skip)]
    root: String,
    groups: Vec<GroupSection>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl Document {
    /// Creates an empty document with the given root element name.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            groups: Vec::new(),
        }
    }

    /// Creates a document from existing groups.
    #[must_use]
    pub fn with_groups(root: impl Into<String>, groups: Vec<GroupSection>) -> Self {
        Self {
            root: root.into(),
            groups,
        }
    }

    /// The root element name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// All groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[GroupSection] {
        &self.groups
    }

    /// Iterates over the groups whose title is exactly `title`.
    pub fn group<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a GroupSection> + 'a {
        self.groups.iter().filter(move |group| group.title == title)
    }

    fn groups_mut<'a>(
        &'a mut self,
        title: &'a str,
    ) -> impl Iterator<Item = &'a mut GroupSection> + 'a {
        self.groups.iter_mut().filter(move |group| group.title == title)
    }

    /// Appends a new empty group.
    pub fn add_group(&mut self, title: impl Into<String>) {
        self.groups.push(GroupSection::new(title));
    }

    /// Appends `entry` to every group titled `group_title`.
    ///
    /// Returns the number of groups the entry was added to.
    pub fn add_content(&mut self, group_title: &str, entry: &ContentSection) -> usize {
        let mut added = 0;
        for group in self.groups_mut(group_title) {
            group.content.push(entry.clone());
            added += 1;
        }
        added
    }

    /// Applies `edit` to every entry titled `old_title` in every group titled
    /// `group_title`.
    ///
    /// Returns the number of entries whose fields actually changed.
    pub fn edit_content(&mut self, group_title: &str, old_title: &str, edit: &ContentEdit) -> usize {
        let mut changed = 0;
        for group in self.groups_mut(group_title) {
            for entry in group.content.iter_mut().filter(|e| e.title == old_title) {
                if entry.apply(edit) {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Moves every entry titled `section_title` out of the groups titled
    /// `from_group` and appends them to the first group titled `to_group`.
    ///
    /// Nothing happens if the destination group does not exist. Returns the
    /// number of entries moved.
    pub fn move_content(&mut self, from_group: &str, to_group: &str, section_title: &str) -> usize {
        let Some(destination) = self.groups.iter().position(|g| g.title == to_group) else {
            return 0;
        };

        let moved: Vec<_> = self
            .groups_mut(from_group)
            .flat_map(|group| group.take_entries(section_title))
            .collect();

        let count = moved.len();
        self.groups[destination].content.extend(moved);
        count
    }

    /// Removes every group titled `title`, with all of its entries.
    ///
    /// Returns the number of groups removed.
    pub fn delete_group(&mut self, title: &str) -> usize {
        let before = self.groups.len();
        self.groups.retain(|group| group.title != title);
        before - self.groups.len()
    }

    /// Removes every entry titled `section_title` from every group titled
    /// `group_title`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_content(&mut self, group_title: &str, section_title: &str) -> usize {
        self.groups_mut(group_title)
            .map(|group| {
                let before = group.content.len();
                group.content.retain(|entry| entry.title != section_title);
                before - group.content.len()
            })
            .sum()
    }

    /// Moves the group titled `title` immediately above or below the group
    /// titled `anchor`.
    ///
    /// Returns whether the order changed.
    ///
    /// # Errors
    ///
    /// Fails if either title matches no group or more than one group.
    pub fn move_group(
        &mut self,
        title: &str,
        anchor: &str,
        position: Position,
    ) -> Result<bool, MoveError> {
        let from = locate(&self.groups, title, SectionKind::Group)?;
        let to = locate(&self.groups, anchor, SectionKind::Group)?;
        Ok(relocate(&mut self.groups, from, to, position))
    }

    /// Moves the entry titled `section_title` immediately above or below the
    /// entry titled `anchor`, within the group titled `group_title`.
    ///
    /// Returns whether the order changed.
    ///
    /// # Errors
    ///
    /// Fails if the group, the entry or the anchor matches nothing or more
    /// than one element.
    pub fn move_content_within_group(
        &mut self,
        group_title: &str,
        section_title: &str,
        anchor: &str,
        position: Position,
    ) -> Result<bool, MoveError> {
        let group = locate(&self.groups, group_title, SectionKind::Group)?;
        let entries = &mut self.groups[group].content;
        let from = locate(entries, section_title, SectionKind::Content)?;
        let to = locate(entries, anchor, SectionKind::Content)?;
        Ok(relocate(entries, from, to, position))
    }
}

/// Where to place a moved element relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Immediately before the anchor.
    Above,
    /// Immediately after the anchor.
    Below,
}

impl Position {
    /// Converts an "above?" answer into a position.
    #[must_use]
    pub const fn from_above(above: bool) -> Self {
        if above { Self::Above } else { Self::Below }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above => f.write_str("above"),
            Self::Below => f.write_str("below"),
        }
    }
}

/// The kind of section a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// A group section.
    Group,
    /// A content section.
    Content,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("group section"),
            Self::Content => f.write_str("content section"),
        }
    }
}

/// A positional move could not be performed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// No section has the requested title.
    #[error("{kind} '{title}' not found")]
    NotFound {
        /// What was being looked up.
        kind: SectionKind,
        /// The title that matched nothing.
        title: String,
    },

    /// More than one section has the requested title.
    #[error("{kind} title '{title}' is ambiguous ({count} matches)")]
    Ambiguous {
        /// What was being looked up.
        kind: SectionKind,
        /// The duplicated title.
        title: String,
        /// How many sections share it.
        count: usize,
    },
}

trait Titled {
    fn title(&self) -> &str;
}

impl Titled for GroupSection {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for ContentSection {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Finds the index of the single element titled `title`.
fn locate<T: Titled>(items: &[T], title: &str, kind: SectionKind) -> Result<usize, MoveError> {
    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.title() == title)
        .map(|(index, _)| index);

    let Some(index) = matches.next() else {
        return Err(MoveError::NotFound {
            kind,
            title: title.to_string(),
        });
    };

    let extra = matches.count();
    if extra > 0 {
        return Err(MoveError::Ambiguous {
            kind,
            title: title.to_string(),
            count: extra + 1,
        });
    }

    Ok(index)
}

/// Moves `items[from]` next to `items[anchor]`. Both indices must be valid.
fn relocate<T>(items: &mut Vec<T>, from: usize, anchor: usize, position: Position) -> bool {
    if from == anchor {
        return false;
    }

    let item = items.remove(from);
    let anchor = if anchor > from { anchor - 1 } else { anchor };
    let target = match position {
        Position::Above => anchor,
        Position::Below => anchor + 1,
    };
    items.insert(target, item);

    target != from
}
