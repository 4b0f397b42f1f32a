//! Interactive input for the console menu.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

/// Source of answers for the interactive menu.
pub trait Prompt {
    /// Picks one of `items`, returning its index.
    fn choose(&mut self, prompt: &str, items: &[&str]) -> anyhow::Result<usize>;

    /// Reads a line of text. May be empty.
    fn text(&mut self, prompt: &str) -> anyhow::Result<String>;

    /// Asks a yes/no question.
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;

    /// Reads a line of text, treating a blank answer as absent.
    fn optional(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        let answer = self.text(prompt)?;
        Ok(Some(answer).filter(|a| !a.trim().is_empty()))
    }
}

/// Prompts on the terminal.
#[derive(Default)]
pub struct Terminal {
    theme: ColorfulTheme,
}

impl Prompt for Terminal {
    fn choose(&mut self, prompt: &str, items: &[&str]) -> anyhow::Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn text(&mut self, prompt: &str) -> anyhow::Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}
