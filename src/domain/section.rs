use serde::Serialize;

/// A named, ordered container of content sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSection {
    /// Heading shown for the group. Not required to be unique.
    pub title: String,
    /// Entries in display order.
    pub content: Vec<ContentSection>,
}

impl GroupSection {
    /// Creates an empty group with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Iterates over the entries whose title is exactly `title`.
    pub fn entries<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a ContentSection> + 'a {
        self.content.iter().filter(move |entry| entry.title == title)
    }

    /// Detaches every entry titled `title`, preserving their relative order.
    pub(crate) fn take_entries(&mut self, title: &str) -> Vec<ContentSection> {
        let (taken, kept) = std::mem::take(&mut self.content)
            .into_iter()
            .partition(|entry| entry.title == title);
        self.content = kept;
        taken
    }
}

/// A single link entry within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSection {
    /// Link target. Treated as an opaque string.
    pub url: String,
    /// Entry title, used to locate the entry.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional hashtags, stored verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<String>,
}

impl ContentSection {
    /// Creates an entry with the required fields and no image or hashtags.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
            image: None,
            hashtags: None,
        }
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Sets the hashtags.
    #[must_use]
    pub fn with_hashtags(mut self, hashtags: Option<String>) -> Self {
        self.hashtags = hashtags;
        self
    }

    /// Overwrites every field supplied in `edit`.
    ///
    /// Returns `true` if any field value actually changed.
    pub fn apply(&mut self, edit: &ContentEdit) -> bool {
        fn set(field: &mut String, value: Option<&String>) -> bool {
            match value {
                Some(value) if field != value => {
                    field.clone_from(value);
                    true
                }
                _ => false,
            }
        }

        fn set_optional(field: &mut Option<String>, value: Option<&String>) -> bool {
            match value {
                Some(value) if field.as_ref() != Some(value) => {
                    *field = Some(value.clone());
                    true
                }
                _ => false,
            }
        }

        // Evaluate every field; no short-circuiting.
        let changes = [
            set(&mut self.url, edit.url.as_ref()),
            set(&mut self.title, edit.title.as_ref()),
            set(&mut self.description, edit.description.as_ref()),
            set_optional(&mut self.image, edit.image.as_ref()),
            set_optional(&mut self.hashtags, edit.hashtags.as_ref()),
        ];
        changes.contains(&true)
    }
}

/// A partial update to a [`ContentSection`].
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentEdit {
    /// Replacement url.
    pub url: Option<String>,
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement image reference.
    pub image: Option<String>,
    /// Replacement hashtags.
    pub hashtags: Option<String>,
}

impl ContentEdit {
    /// Sets the replacement url.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement image reference.
    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the replacement hashtags.
    #[must_use]
    pub fn hashtags(mut self, hashtags: impl Into<String>) -> Self {
        self.hashtags = Some(hashtags.into());
        self
    }

    /// Returns `true` if no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.hashtags.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ContentSection {
        ContentSection::new("u1", "t1", "d1")
    }

    #[test]
    fn apply_overwrites_only_supplied_fields() {
        let mut entry = entry();
        let changed = entry.apply(&ContentEdit::default().url("u2"));

        assert!(changed);
        assert_eq!(entry.url, "u2");
        assert_eq!(entry.title, "t1");
        assert_eq!(entry.description, "d1");
        assert_eq!(entry.image, None);
    }

    #[test]
    fn apply_sets_missing_optional_fields() {
        let mut entry = entry();
        entry.apply(&ContentEdit::default().image("cat.png").hashtags("#cats"));

        assert_eq!(entry.image.as_deref(), Some("cat.png"));
        assert_eq!(entry.hashtags.as_deref(), Some("#cats"));
    }

    #[test]
    fn apply_reports_no_change_for_identical_values() {
        let mut entry = entry();
        assert!(!entry.apply(&ContentEdit::default().url("u1").title("t1")));
        assert!(!entry.apply(&ContentEdit::default()));
    }

    #[test]
    fn take_entries_keeps_remaining_order() {
        let mut group = GroupSection::new("G");
        group.content = vec![
            ContentSection::new("a", "A", ""),
            ContentSection::new("x1", "X", ""),
            ContentSection::new("b", "B", ""),
            ContentSection::new("x2", "X", ""),
        ];

        let taken = group.take_entries("X");

        let taken: Vec<_> = taken.iter().map(|e| e.url.as_str()).collect();
        let kept: Vec<_> = group.content.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(taken, ["x1", "x2"]);
        assert_eq!(kept, ["a", "b"]);
    }
}
