//! A source-backed document editor
//!
//! The [`Editor`] owns one in-memory [`Document`] loaded from a [`Source`],
//! and tracks whether it has changed since it was last loaded or saved.
//! Mutations never touch the source; only [`Editor::save`] and
//! [`Editor::discard`] do.

use std::{io, path::PathBuf};

use tracing::instrument;

use crate::{
    domain::{Config, ContentEdit, ContentSection, Document, GroupSection, MoveError, Position},
    storage::{
        FileSource, Source,
        xml::{self, ParseError, RenderError},
    },
};

/// An editing session over a single document.
#[derive(Debug)]
pub struct Editor<S = FileSource> {
    source: S,
    config: Config,
    document: Document,
    dirty: bool,
}

impl Editor<FileSource> {
    /// Opens the document file at `path`.
    ///
    /// Settings are read from `sitedoc.toml` next to the file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let config = Config::for_document(&path);
        Self::load(FileSource::new(path), config)
    }
}

impl<S: Source> Editor<S> {
    /// Loads the document from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is not a valid
    /// document.
    pub fn load(source: S, config: Config) -> Result<Self, LoadError> {
        let document = read_document(&source)?;
        tracing::debug!(
            "Loaded {} groups from {}",
            document.groups().len(),
            source.location()
        );
        Ok(Self {
            source,
            config,
            document,
            dirty: false,
        })
    }

    /// The current in-memory document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// All groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[GroupSection] {
        self.document.groups()
    }

    /// Iterates over the groups titled `title`.
    pub fn group<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a GroupSection> + 'a {
        self.document.group(title)
    }

    /// The backing source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The rendering configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the document has changed since it was last loaded or saved.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn touch(&mut self, changed: bool) {
        self.dirty |= changed;
    }

    /// Appends a new empty group.
    #[instrument(skip(self))]
    pub fn add_group(&mut self, title: &str) {
        self.document.add_group(title);
        self.touch(true);
        tracing::info!("Added group section '{title}'");
    }

    /// Appends `entry` to every group titled `group_title`.
    ///
    /// Returns the number of groups the entry was added to.
    #[instrument(skip(self, entry), fields(entry = %entry.title))]
    pub fn add_content(&mut self, group_title: &str, entry: ContentSection) -> usize {
        let added = self.document.add_content(group_title, &entry);
        self.touch(added > 0);
        log_outcome("Added content section to", added, group_title);
        added
    }

    /// Applies `edit` to every entry titled `old_title` in the groups titled
    /// `group_title`.
    ///
    /// Returns the number of entries that changed.
    #[instrument(skip(self))]
    pub fn edit_content(&mut self, group_title: &str, old_title: &str, edit: &ContentEdit) -> usize {
        let changed = self.document.edit_content(group_title, old_title, edit);
        self.touch(changed > 0);
        log_outcome("Edited content section in", changed, group_title);
        changed
    }

    /// Moves the entries titled `section_title` from the groups titled
    /// `old_group_title` to the end of the group titled `new_group_title`.
    ///
    /// Returns the number of entries moved.
    #[instrument(skip(self))]
    pub fn move_content(
        &mut self,
        old_group_title: &str,
        new_group_title: &str,
        section_title: &str,
    ) -> usize {
        let moved = self
            .document
            .move_content(old_group_title, new_group_title, section_title);
        self.touch(moved > 0);
        log_outcome("Moved content section to", moved, new_group_title);
        moved
    }

    /// Deletes every group titled `group_title`.
    ///
    /// Returns the number of groups deleted.
    #[instrument(skip(self))]
    pub fn delete_group(&mut self, group_title: &str) -> usize {
        let deleted = self.document.delete_group(group_title);
        self.touch(deleted > 0);
        log_outcome("Deleted group section", deleted, group_title);
        deleted
    }

    /// Deletes every entry titled `section_title` in the groups titled
    /// `group_title`.
    ///
    /// Returns the number of entries deleted.
    #[instrument(skip(self))]
    pub fn delete_content(&mut self, group_title: &str, section_title: &str) -> usize {
        let deleted = self.document.delete_content(group_title, section_title);
        self.touch(deleted > 0);
        log_outcome("Deleted content section from", deleted, group_title);
        deleted
    }

    /// Moves a group above or below another group.
    ///
    /// # Errors
    ///
    /// Returns an error if either title does not identify exactly one group.
    /// The document is unchanged in that case.
    #[instrument(skip(self))]
    pub fn move_group(
        &mut self,
        group_title: &str,
        anchor_title: &str,
        position: Position,
    ) -> Result<(), MoveError> {
        let changed = self
            .document
            .move_group(group_title, anchor_title, position)?;
        self.touch(changed);
        tracing::info!("Moved group section '{group_title}' {position} '{anchor_title}'");
        Ok(())
    }

    /// Moves an entry above or below another entry in the same group.
    ///
    /// # Errors
    ///
    /// Returns an error if the group, the entry or the anchor does not
    /// identify exactly one element. The document is unchanged in that case.
    #[instrument(skip(self))]
    pub fn move_content_within_group(
        &mut self,
        group_title: &str,
        section_title: &str,
        anchor_title: &str,
        position: Position,
    ) -> Result<(), MoveError> {
        let changed = self.document.move_content_within_group(
            group_title,
            section_title,
            anchor_title,
            position,
        )?;
        self.touch(changed);
        tracing::info!(
            "Moved content section '{section_title}' {position} '{anchor_title}' in '{group_title}'"
        );
        Ok(())
    }

    /// Writes the document back to its source and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be rendered or written. The
    /// document and the dirty flag are left as they were.
    #[instrument(skip(self))]
    pub fn save(&mut self) -> Result<(), SaveError> {
        let bytes = xml::render(&self.document, &self.config)?;
        self.source.write(&bytes).map_err(|source| SaveError::Io {
            location: self.source.location(),
            source,
        })?;
        self.dirty = false;
        tracing::info!("Saved {}", self.source.location());
        Ok(())
    }

    /// Reloads the document from its source, dropping unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed. The in-memory
    /// document and the dirty flag are left as they were.
    #[instrument(skip(self))]
    pub fn discard(&mut self) -> Result<(), LoadError> {
        self.document = read_document(&self.source)?;
        self.dirty = false;
        tracing::info!("Discarded changes, reloaded {}", self.source.location());
        Ok(())
    }
}

fn read_document<S: Source>(source: &S) -> Result<Document, LoadError> {
    let bytes = source.read().map_err(|e| LoadError::Io {
        location: source.location(),
        source: e,
    })?;
    xml::parse(&bytes).map_err(|e| LoadError::Parse {
        location: source.location(),
        source: e,
    })
}

fn log_outcome(action: &str, count: usize, group_title: &str) {
    if count == 0 {
        tracing::debug!("{action} '{group_title}': no match");
    } else {
        tracing::info!("{action} '{group_title}' ({count})");
    }
}

/// Errors that can occur when loading a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be read.
    #[error("failed to read {location}")]
    Io {
        /// The source location.
        location: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The source does not contain a valid document.
    #[error("failed to parse {location}")]
    Parse {
        /// The source location.
        location: String,
        /// The underlying error.
        #[source]
        source: ParseError,
    },
}

/// Errors that can occur when saving a document.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The document could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The destination could not be written.
    #[error("failed to write {location}")]
    Io {
        /// The source location.
        location: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::MemorySource;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<website>
  <groupSections>
    <groupSection>
      <title>P</title>
      <contentSections>
        <contentSection>
          <url>u1</url>
          <title>t1</title>
          <description>d1</description>
        </contentSection>
      </contentSections>
    </groupSection>
    <groupSection>
      <title>Q</title>
      <contentSections/>
    </groupSection>
    <groupSection>
      <title>R</title>
      <contentSections/>
    </groupSection>
  </groupSections>
</website>
"#;

    fn editor() -> Editor<MemorySource> {
        Editor::load(MemorySource::new(SAMPLE), Config::default()).unwrap()
    }

    fn setup_file_editor() -> (TempDir, Editor) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().join("index.xml");
        std::fs::write(&path, SAMPLE).unwrap();
        let editor = Editor::open(path).unwrap();
        (tmp, editor)
    }

    fn titles<S: Source>(editor: &Editor<S>) -> Vec<String> {
        editor.groups().iter().map(|g| g.title.clone()).collect()
    }

    /// A source that can be read but refuses every write.
    struct ReadOnly(MemorySource);

    impl Source for ReadOnly {
        fn read(&self) -> io::Result<Vec<u8>> {
            self.0.read()
        }

        fn write(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn location(&self) -> String {
            "read-only".to_string()
        }
    }

    #[test]
    fn freshly_loaded_editor_is_clean() {
        assert!(!editor().is_dirty());
    }

    #[test]
    fn resave_of_unmodified_document_is_identical() {
        let (tmp, mut editor) = setup_file_editor();
        let original = editor.document().clone();

        editor.save().unwrap();

        let reloaded = Editor::open(tmp.path().join("index.xml")).unwrap();
        assert_eq!(reloaded.document(), &original);
    }

    #[test]
    fn add_group_then_find() {
        let mut editor = editor();
        editor.add_group("G");

        let found: Vec<_> = editor.group("G").collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].content.is_empty());
        assert!(editor.is_dirty());
    }

    #[test]
    fn add_content_then_read_fields() {
        let mut editor = editor();
        editor.add_group("G");
        assert_eq!(editor.add_content("G", ContentSection::new("u", "t", "d")), 1);

        let entry = editor.group("G").next().unwrap().entries("t").next().unwrap();
        assert_eq!(entry.url, "u");
        assert_eq!(entry.title, "t");
        assert_eq!(entry.description, "d");
        assert_eq!(entry.image, None);
        assert_eq!(entry.hashtags, None);
    }

    #[test]
    fn edit_preserves_unspecified_fields() {
        let mut editor = editor();
        let changed = editor.edit_content("P", "t1", &ContentEdit::default().url("u2"));

        assert_eq!(changed, 1);
        let entry = &editor.groups()[0].content[0];
        assert_eq!(entry.url, "u2");
        assert_eq!(entry.title, "t1");
        assert_eq!(entry.description, "d1");
    }

    #[test]
    fn move_content_transfers_ownership() {
        let mut editor = editor();
        let before = editor.groups()[0].content[0].clone();

        assert_eq!(editor.move_content("P", "Q", "t1"), 1);

        assert!(editor.groups()[0].content.is_empty());
        assert_eq!(editor.groups()[1].content, vec![before]);
    }

    #[test]
    fn move_group_orders() {
        let mut above = editor();
        above.move_group("R", "P", Position::Above).unwrap();
        assert_eq!(titles(&above), ["R", "P", "Q"]);

        let mut below = editor();
        below.move_group("R", "P", Position::Below).unwrap();
        assert_eq!(titles(&below), ["P", "R", "Q"]);
    }

    #[test]
    fn failed_move_keeps_editor_clean() {
        let mut editor = editor();
        assert!(editor.move_group("R", "missing", Position::Above).is_err());
        assert_eq!(titles(&editor), ["P", "Q", "R"]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn no_match_operations_keep_editor_clean() {
        let mut editor = editor();

        assert_eq!(editor.add_content("missing", ContentSection::new("u", "t", "d")), 0);
        assert_eq!(editor.edit_content("P", "missing", &ContentEdit::default().url("x")), 0);
        assert_eq!(editor.move_content("P", "missing", "t1"), 0);
        assert_eq!(editor.delete_group("missing"), 0);
        assert_eq!(editor.delete_content("P", "missing"), 0);

        assert!(!editor.is_dirty());
    }

    #[test]
    fn discard_reverts_to_last_saved_state() {
        let (_tmp, mut editor) = setup_file_editor();
        let original = editor.document().clone();

        editor.add_group("G");
        editor.delete_group("P");
        editor.move_group("R", "Q", Position::Above).unwrap();
        assert!(editor.is_dirty());

        editor.discard().unwrap();

        assert_eq!(editor.document(), &original);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn discard_after_save_keeps_saved_changes() {
        let (_tmp, mut editor) = setup_file_editor();
        editor.add_group("Saved");
        editor.save().unwrap();
        editor.add_group("Unsaved");

        editor.discard().unwrap();

        assert_eq!(titles(&editor), ["P", "Q", "R", "Saved"]);
    }

    #[test]
    fn titles_with_surrounding_whitespace_survive_save_and_discard() {
        let (_tmp, mut editor) = setup_file_editor();
        editor.add_group("  Spaced Group ");
        editor.add_content(
            "  Spaced Group ",
            ContentSection::new("u", " entry ", "  two  spaces  "),
        );
        editor.save().unwrap();
        let saved = editor.document().clone();

        editor.discard().unwrap();

        assert_eq!(editor.document(), &saved);
        assert_eq!(editor.group("  Spaced Group ").count(), 1);
        assert_eq!(
            editor.delete_content("  Spaced Group ", " entry "),
            1,
            "reloaded titles must still match exactly"
        );
    }

    #[test]
    fn save_failure_keeps_dirty_flag_and_tree() {
        let source = ReadOnly(MemorySource::new(SAMPLE));
        let mut editor = Editor::load(source, Config::default()).unwrap();
        editor.add_group("G");
        let before = editor.document().clone();

        let error = editor.save().unwrap_err();

        assert!(matches!(error, SaveError::Io { .. }));
        assert!(editor.is_dirty());
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn save_into_removed_directory_fails() {
        let (tmp, mut editor) = setup_file_editor();
        editor.add_group("G");
        std::fs::remove_dir_all(tmp.path()).unwrap();

        assert!(editor.save().is_err());
        assert!(editor.is_dirty());
    }

    #[test]
    fn discard_failure_keeps_changes() {
        let (tmp, mut editor) = setup_file_editor();
        editor.add_group("G");
        std::fs::write(tmp.path().join("index.xml"), "not xml at all <").unwrap();

        let error = editor.discard().unwrap_err();

        assert!(matches!(error, LoadError::Parse { .. }));
        assert!(editor.is_dirty());
        assert_eq!(titles(&editor), ["P", "Q", "R", "G"]);
    }

    #[test]
    fn open_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let error = Editor::open(tmp.path().join("missing.xml")).unwrap_err();
        assert!(matches!(error, LoadError::Io { .. }));
    }

    #[test]
    fn open_uses_sibling_config() {
        let (tmp, mut editor) = setup_file_editor();
        let mut config = Config::default();
        config.set_stylesheet(None);
        config.save(&tmp.path().join("sitedoc.toml")).unwrap();

        let mut reopened = Editor::open(tmp.path().join("index.xml")).unwrap();
        reopened.add_group("G");
        reopened.save().unwrap();

        let saved = std::fs::read_to_string(tmp.path().join("index.xml")).unwrap();
        assert!(!saved.contains("xml-stylesheet"));
        assert_eq!(editor.config(), &Config::default());

        // The first editor still renders with its own settings.
        editor.save().unwrap();
        let saved = std::fs::read_to_string(tmp.path().join("index.xml")).unwrap();
        assert!(saved.contains("xml-stylesheet"));
    }

    #[test]
    fn editors_over_different_sources_are_independent() {
        let mut first = editor();
        let second = editor();

        first.add_group("only-first");

        assert!(first.is_dirty());
        assert!(!second.is_dirty());
        assert_eq!(second.group("only-first").count(), 0);
    }

    #[test]
    fn memory_source_receives_saved_document() {
        let mut editor = editor();
        editor.add_group("G");
        editor.save().unwrap();

        let reparsed = xml::parse(editor.source().bytes()).unwrap();
        assert_eq!(&reparsed, editor.document());
    }
}
