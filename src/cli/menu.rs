//! The interactive console menu

use std::path::Path;

use sitedoc::{ContentEdit, ContentSection, Editor, Position, Source};
use tracing::instrument;

use crate::cli::{
    prompt::{self, Prompt},
    show,
    terminal::Colorize,
};

#[derive(Debug, Default, clap::Parser)]
pub struct Command {}

impl Command {
    #[instrument]
    pub fn run(self, file: &Path) -> anyhow::Result<()> {
        let mut editor = Editor::open(file)?;
        run(&mut editor, &mut prompt::Terminal::default())
    }
}

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddGroup,
    AddContent,
    EditContent,
    MoveContent,
    DeleteGroup,
    DeleteContent,
    MoveGroup,
    MoveContentWithinGroup,
    Save,
    Discard,
    Show,
    Exit,
}

impl Action {
    const ALL: [Self; 12] = [
        Self::AddGroup,
        Self::AddContent,
        Self::EditContent,
        Self::MoveContent,
        Self::DeleteGroup,
        Self::DeleteContent,
        Self::MoveGroup,
        Self::MoveContentWithinGroup,
        Self::Save,
        Self::Discard,
        Self::Show,
        Self::Exit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::AddGroup => "Add a new group section",
            Self::AddContent => "Add a new content section",
            Self::EditContent => "Edit an existing content section",
            Self::MoveContent => "Move a content section to another group",
            Self::DeleteGroup => "Delete a group section",
            Self::DeleteContent => "Delete a content section",
            Self::MoveGroup => "Move a group section",
            Self::MoveContentWithinGroup => "Move a content section within a group",
            Self::Save => "Save changes",
            Self::Discard => "Discard changes",
            Self::Show => "Show the document",
            Self::Exit => "Exit",
        }
    }
}

/// What happened as a result of a menu action.
enum Report {
    /// The action did something.
    Done(String),
    /// The action matched nothing.
    Nothing(String),
    /// Nothing to report.
    Silent,
}

impl Report {
    fn counted(count: usize, done: String, nothing: String) -> Self {
        if count == 0 {
            Self::Nothing(nothing)
        } else {
            Self::Done(done)
        }
    }

    fn print(self) {
        match self {
            Self::Done(message) => println!("{}", message.success()),
            Self::Nothing(message) => println!("{}", message.warning()),
            Self::Silent => {}
        }
    }
}

/// Runs the menu until the user exits.
///
/// Errors from individual actions are reported and the loop continues; only
/// prompt failures end it.
pub fn run<S: Source, P: Prompt>(editor: &mut Editor<S>, prompt: &mut P) -> anyhow::Result<()> {
    let labels = Action::ALL.map(Action::label);

    loop {
        let choice = prompt.choose("Website Editor Options", &labels)?;
        let action = *Action::ALL
            .get(choice)
            .ok_or_else(|| anyhow::anyhow!("invalid choice {choice}"))?;

        if action == Action::Exit {
            if exit(editor, prompt)? {
                println!("Exiting...");
                return Ok(());
            }
            continue;
        }

        match perform(action, editor, prompt) {
            Ok(report) => report.print(),
            Err(e) => println!("{}", format!("Error: {e:#}").error()),
        }
    }
}

/// Returns whether the menu should close.
fn exit<S: Source, P: Prompt>(editor: &mut Editor<S>, prompt: &mut P) -> anyhow::Result<bool> {
    if !editor.is_dirty() {
        return Ok(true);
    }

    if prompt.confirm("You have unsaved changes. Do you want to save them before exiting?")? {
        if let Err(e) = editor.save() {
            println!("{}", format!("Error: {:#}", anyhow::Error::from(e)).error());
            return Ok(false);
        }
        println!("{}", "Changes saved.".success());
    } else {
        println!("{}", "Changes discarded.".warning());
    }
    Ok(true)
}

fn ask_position<P: Prompt>(prompt: &mut P) -> anyhow::Result<Position> {
    Ok(Position::from_above(prompt.confirm("Move above?")?))
}

#[allow(clippy::too_many_lines)]
fn perform<S: Source, P: Prompt>(
    action: Action,
    editor: &mut Editor<S>,
    prompt: &mut P,
) -> anyhow::Result<Report> {
    let report = match action {
        Action::AddGroup => {
            let title = prompt.text("Enter the title of the new group section")?;
            editor.add_group(&title);
            Report::Done(format!("Added new group section '{title}'"))
        }
        Action::AddContent => {
            let group = prompt
                .text("Enter the group title where the new content section will be added")?;
            let url = prompt.text("Enter the URL")?;
            let title = prompt.text("Enter the title")?;
            let description = prompt.text("Enter the description")?;
            let image = prompt.optional("Enter the image URL (or leave blank)")?;
            let hashtags = prompt.optional("Enter the hashtags (or leave blank)")?;

            let entry = ContentSection::new(url, title, description)
                .with_image(image)
                .with_hashtags(hashtags);
            let added = editor.add_content(&group, entry);
            Report::counted(
                added,
                format!("Added new content section to group '{group}'"),
                format!("No group section titled '{group}'"),
            )
        }
        Action::EditContent => {
            let group = prompt.text("Enter the group title of the content section to edit")?;
            let old_title = prompt.text("Enter the current title of the content section")?;
            let edit = ContentEdit {
                url: prompt.optional("Enter the new URL (or leave blank to keep current)")?,
                title: prompt.optional("Enter the new title (or leave blank to keep current)")?,
                description: prompt
                    .optional("Enter the new description (or leave blank to keep current)")?,
                image: prompt.optional("Enter the new image URL (or leave blank to keep current)")?,
                hashtags: prompt
                    .optional("Enter the new hashtags (or leave blank to keep current)")?,
            };
            let changed = editor.edit_content(&group, &old_title, &edit);
            Report::counted(
                changed,
                format!("Edited content section '{old_title}' in group '{group}'"),
                format!("Nothing changed for '{old_title}' in group '{group}'"),
            )
        }
        Action::MoveContent => {
            let from = prompt.text("Enter the current group title of the content section")?;
            let to = prompt
                .text("Enter the new group title where the content section will be moved")?;
            let title = prompt.text("Enter the title of the content section to move")?;
            let moved = editor.move_content(&from, &to, &title);
            Report::counted(
                moved,
                format!("Moved content section '{title}' from '{from}' to '{to}'"),
                format!("No content section '{title}' moved from '{from}' to '{to}'"),
            )
        }
        Action::DeleteGroup => {
            let title = prompt.text("Enter the title of the group section to delete")?;
            let deleted = editor.delete_group(&title);
            Report::counted(
                deleted,
                format!("Deleted group section '{title}'"),
                format!("No group section titled '{title}'"),
            )
        }
        Action::DeleteContent => {
            let group = prompt.text("Enter the group title of the content section to delete")?;
            let title = prompt.text("Enter the title of the content section to delete")?;
            let deleted = editor.delete_content(&group, &title);
            Report::counted(
                deleted,
                format!("Deleted content section '{title}' in group '{group}'"),
                format!("No content section '{title}' in group '{group}'"),
            )
        }
        Action::MoveGroup => {
            let title = prompt.text("Enter the title of the group section to move")?;
            let anchor = prompt.text("Enter the title of the group section to move above/below")?;
            let position = ask_position(prompt)?;
            editor.move_group(&title, &anchor, position)?;
            Report::Done(format!("Moved group section '{title}' {position} '{anchor}'"))
        }
        Action::MoveContentWithinGroup => {
            let group =
                prompt.text("Enter the title of the group containing the content sections")?;
            let title = prompt.text("Enter the title of the content section to move")?;
            let anchor =
                prompt.text("Enter the title of the content section to move above/below")?;
            let position = ask_position(prompt)?;
            editor.move_content_within_group(&group, &title, &anchor, position)?;
            Report::Done(format!(
                "Moved content section '{title}' {position} '{anchor}' in group '{group}'"
            ))
        }
        Action::Save => {
            editor.save()?;
            Report::Done("Changes saved.".to_string())
        }
        Action::Discard => {
            editor.discard()?;
            Report::Done("Changes discarded.".to_string())
        }
        Action::Show => {
            show::print_tree(editor.document());
            Report::Silent
        }
        Action::Exit => unreachable!("exit is handled by the menu loop"),
    };
    Ok(report)
}
