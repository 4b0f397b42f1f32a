use std::path::Path;

use sitedoc::{Document, Editor};
use tracing::instrument;

use crate::cli::terminal::{self, Colorize};

/// Width used when the terminal size is unknown.
const FALLBACK_WIDTH: usize = 100;

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Print the document as JSON
    #[arg(long)]
    json: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, file: &Path) -> anyhow::Result<()> {
        let editor = Editor::open(file)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(editor.document())?);
        } else {
            print!("{}", render_tree(editor.document(), width()));
        }
        Ok(())
    }
}

fn width() -> usize {
    terminal::terminal_width().unwrap_or(FALLBACK_WIDTH)
}

/// Prints the document as an indented outline.
pub fn print_tree(document: &Document) {
    print!("{}", render_tree(document, width()));
}

/// Renders the document as an outline, cutting long lines at `width`.
pub fn render_tree(document: &Document, width: usize) -> String {
    if document.groups().is_empty() {
        return format!("{}\n", "(no group sections)".dim());
    }

    let detail_width = width.saturating_sub(5);
    let mut out = String::new();
    for (i, group) in document.groups().iter().enumerate() {
        out.push_str(&format!("{}\n", format!("{}. {}", i + 1, group.title).heading()));
        if group.content.is_empty() {
            out.push_str(&format!("   {}\n", "(empty)".dim()));
        }
        for entry in &group.content {
            let url = terminal::truncate(&format!("<{}>", entry.url), width.saturating_sub(8));
            out.push_str(&format!("   - {} {}\n", entry.title, url.dim()));
            if !entry.description.is_empty() {
                let description = terminal::truncate(&entry.description, detail_width);
                out.push_str(&format!("     {description}\n"));
            }
            if let Some(image) = &entry.image {
                let image = terminal::truncate(&format!("image: {image}"), detail_width);
                out.push_str(&format!("     {}\n", image.dim()));
            }
            if let Some(hashtags) = &entry.hashtags {
                let hashtags = terminal::truncate(hashtags, detail_width);
                out.push_str(&format!("     {}\n", hashtags.dim()));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use sitedoc::ContentSection;

    use super::*;

    #[test]
    fn render_tree_lists_groups_and_entries() {
        let mut document = Document::default();
        document.add_group("Tools");
        document.add_group("Empty");
        document.add_content(
            "Tools",
            &ContentSection::new("https://example.com", "Example", "An example site")
                .with_hashtags(Some("#demo".to_string())),
        );

        let tree = render_tree(&document, 80);

        assert!(tree.contains("1. Tools"));
        assert!(tree.contains("- Example"));
        assert!(tree.contains("<https://example.com>"));
        assert!(tree.contains("An example site"));
        assert!(tree.contains("#demo"));
        assert!(tree.contains("2. Empty"));
        assert!(tree.contains("(empty)"));
    }

    #[test]
    fn render_tree_puts_each_item_on_its_own_line() {
        let mut document = Document::default();
        document.add_group("Tools");
        document.add_content(
            "Tools",
            &ContentSection::new("u", "Example", "desc")
                .with_image(Some("pic.png".to_string()))
                .with_hashtags(Some("#demo".to_string())),
        );
        document.add_group("Empty");

        let tree = render_tree(&document, 80);

        assert!(tree.ends_with('\n'));
        assert_eq!(tree.lines().count(), 7);
        assert!(tree.lines().nth(2).is_some_and(|line| line.contains("desc")));
    }

    #[test]
    fn render_tree_of_empty_document() {
        assert!(render_tree(&Document::default(), 80).contains("no group sections"));
    }

    #[test]
    fn render_tree_truncates_long_descriptions() {
        let mut document = Document::default();
        document.add_group("G");
        document.add_content("G", &ContentSection::new("u", "t", "x".repeat(200)));

        let tree = render_tree(&document, 40);
        assert!(tree.contains('…'));
        assert!(!tree.contains(&"x".repeat(100)));
    }
}
