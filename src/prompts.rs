//! Interactive prompts for report selection
//!
//! Input collection happens entirely before any network activity; empty
//! answers are re-prompted here and never reach the pipeline.

use crate::error::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};

/// Prompt for a non-empty line of text, re-prompting until one is given
pub fn input_required(message: &str) -> Result<String> {
    loop {
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()?;

        let trimmed = value.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
        warning("A value is required");
    }
}

/// Prompt for a non-empty multi-selection, re-prompting until at least one
/// item is checked
pub fn multi_select_required<T: ToString>(message: &str, options: &[T]) -> Result<Vec<usize>> {
    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    loop {
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(&items)
            .interact()?;

        if !selected.is_empty() {
            return Ok(selected);
        }
        warning("Select at least one category (space to toggle, enter to confirm)");
    }
}

/// Prompt for yes/no confirmation with a default value
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    let result = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(result)
}

/// Display an info message
pub fn info(message: &str) {
    println!("{} {}", "→".cyan(), message);
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}
