use std::path::{Path, PathBuf};

mod menu;
mod prompt;
mod show;
mod terminal;

use clap::ArgAction;
use sitedoc::{ContentEdit, ContentSection, Editor, Position};
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The website document to edit
    #[arg(short, long, default_value = "index.xml", global = true)]
    file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Menu(menu::Command::default()))
            .run(&self.file)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Edit the document interactively (default)
    Menu(menu::Command),

    /// Print the document
    Show(show::Command),

    /// Add a new group section at the end of the document
    AddGroup(AddGroup),

    /// Add a content section to every group with the given title
    AddContent(AddContent),

    /// Edit the fields of a content section
    ///
    /// Only the fields given on the command line are changed.
    EditContent(EditContent),

    /// Move a content section to the end of another group
    MoveContent(MoveContent),

    /// Delete every group section with the given title
    DeleteGroup(DeleteGroup),

    /// Delete a content section from a group
    DeleteContent(DeleteContent),

    /// Move a group section above or below another group section
    MoveGroup(MoveGroup),

    /// Move a content section above or below another in the same group
    MoveWithin(MoveWithin),
}

impl Command {
    fn run(self, file: &Path) -> anyhow::Result<()> {
        match self {
            Self::Menu(command) => command.run(file)?,
            Self::Show(command) => command.run(file)?,
            Self::AddGroup(command) => command.run(file)?,
            Self::AddContent(command) => command.run(file)?,
            Self::EditContent(command) => command.run(file)?,
            Self::MoveContent(command) => command.run(file)?,
            Self::DeleteGroup(command) => command.run(file)?,
            Self::DeleteContent(command) => command.run(file)?,
            Self::MoveGroup(command) => command.run(file)?,
            Self::MoveWithin(command) => command.run(file)?,
        }
        Ok(())
    }
}

/// Saves the editor if anything changed and prints the outcome.
fn finish(editor: &mut Editor, done: &str, nothing: &str) -> anyhow::Result<()> {
    if editor.is_dirty() {
        editor.save()?;
        println!("{}", format!("✅ {done}").success());
    } else {
        println!("{}", format!("⚠️  {nothing}").warning());
    }
    Ok(())
}

/// Placement relative to an anchor, as command line flags.
#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub struct Placement {
    /// Place immediately above this title
    #[arg(long, value_name = "TITLE")]
    above: Option<String>,

    /// Place immediately below this title
    #[arg(long, value_name = "TITLE")]
    below: Option<String>,
}

impl Placement {
    fn resolve(self) -> (String, Position) {
        match (self.above, self.below) {
            (Some(anchor), _) => (anchor, Position::Above),
            (None, Some(anchor)) => (anchor, Position::Below),
            (None, None) => unreachable!("clap requires one of --above/--below"),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddGroup {
    /// The title of the new group section
    title: String,
}

impl AddGroup {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let mut editor = Editor::open(file)?;
        editor.add_group(&self.title);
        finish(
            &mut editor,
            &format!("Added group section '{}'", self.title),
            "Nothing added",
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddContent {
    /// The group section(s) to add to
    group: String,

    /// The link target
    #[arg(long)]
    url: String,

    /// The title of the new content section
    #[arg(long)]
    title: String,

    /// A description of the link
    #[arg(long, default_value = "")]
    description: String,

    /// An image reference
    #[arg(long)]
    image: Option<String>,

    /// Hashtags, stored verbatim
    #[arg(long)]
    hashtags: Option<String>,
}

impl AddContent {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let mut editor = Editor::open(file)?;
        let entry = ContentSection::new(self.url, self.title, self.description)
            .with_image(self.image)
            .with_hashtags(self.hashtags);
        let added = editor.add_content(&self.group, entry);
        finish(
            &mut editor,
            &format!("Added content section to {added} group(s) '{}'", self.group),
            &format!("No group section titled '{}'", self.group),
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct EditContent {
    /// The group section(s) containing the entry
    group: String,

    /// The current title of the content section
    title: String,

    /// New link target
    #[arg(long)]
    url: Option<String>,

    /// New title
    #[arg(long)]
    new_title: Option<String>,

    /// New description
    #[arg(long)]
    description: Option<String>,

    /// New image reference
    #[arg(long)]
    image: Option<String>,

    /// New hashtags
    #[arg(long)]
    hashtags: Option<String>,
}

impl EditContent {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let edit = ContentEdit {
            url: self.url,
            title: self.new_title,
            description: self.description,
            image: self.image,
            hashtags: self.hashtags,
        };
        if edit.is_empty() {
            anyhow::bail!(
                "nothing to edit: pass at least one of --url, --new-title, --description, \
                 --image or --hashtags"
            );
        }

        let mut editor = Editor::open(file)?;
        let changed = editor.edit_content(&self.group, &self.title, &edit);
        finish(
            &mut editor,
            &format!("Edited {changed} content section(s) '{}'", self.title),
            &format!("Nothing changed for '{}' in '{}'", self.title, self.group),
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct MoveContent {
    /// The group section the entry is in
    from: String,

    /// The group section to move it to
    to: String,

    /// The title of the content section
    title: String,
}

impl MoveContent {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let mut editor = Editor::open(file)?;
        let moved = editor.move_content(&self.from, &self.to, &self.title);
        finish(
            &mut editor,
            &format!("Moved {moved} content section(s) '{}' to '{}'", self.title, self.to),
            &format!(
                "Nothing moved: need '{}' in '{}' and an existing group '{}'",
                self.title, self.from, self.to
            ),
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct DeleteGroup {
    /// The title of the group section(s) to delete
    title: String,
}

impl DeleteGroup {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let mut editor = Editor::open(file)?;
        let deleted = editor.delete_group(&self.title);
        finish(
            &mut editor,
            &format!("Deleted {deleted} group section(s) '{}'", self.title),
            &format!("No group section titled '{}'", self.title),
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct DeleteContent {
    /// The group section(s) containing the entry
    group: String,

    /// The title of the content section(s) to delete
    title: String,
}

impl DeleteContent {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let mut editor = Editor::open(file)?;
        let deleted = editor.delete_content(&self.group, &self.title);
        finish(
            &mut editor,
            &format!("Deleted {deleted} content section(s) '{}'", self.title),
            &format!("No content section '{}' in '{}'", self.title, self.group),
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct MoveGroup {
    /// The title of the group section to move
    title: String,

    #[command(flatten)]
    placement: Placement,
}

impl MoveGroup {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let (anchor, position) = self.placement.resolve();
        let mut editor = Editor::open(file)?;
        editor.move_group(&self.title, &anchor, position)?;
        finish(
            &mut editor,
            &format!("Moved group section '{}' {position} '{anchor}'", self.title),
            "Order unchanged",
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct MoveWithin {
    /// The group section containing both entries
    group: String,

    /// The title of the content section to move
    title: String,

    #[command(flatten)]
    placement: Placement,
}

impl MoveWithin {
    #[instrument]
    fn run(self, file: &Path) -> anyhow::Result<()> {
        let (anchor, position) = self.placement.resolve();
        let mut editor = Editor::open(file)?;
        editor.move_content_within_group(&self.group, &self.title, &anchor, position)?;
        finish(
            &mut editor,
            &format!(
                "Moved content section '{}' {position} '{anchor}' in '{}'",
                self.title, self.group
            ),
            "Order unchanged",
        )
    }
}
