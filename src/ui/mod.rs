//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Result};
use console::style;

use crate::version::ReleaseVersions;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_congratulations, display_error, display_release_plan, display_release_summary,
    display_step_header, display_status, display_success, display_warning,
};

/// Whether a person can answer prompts on standard input.
pub fn stdin_is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompts the user for a yes/no answer.
///
/// Anything other than `y` or `yes` (case-insensitive) counts as no.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    read_confirmation(&mut io::stdin().lock())
}

/// Reads one answer line. End of input is an error, not a "no".
pub fn read_confirmation<R: BufRead>(reader: &mut R) -> Result<bool> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        bail!("No confirmation received (standard input closed); pass --yes to release");
    }

    Ok(parse_confirmation(&input))
}

/// Asks the user to confirm releasing `versions` under `tag`.
pub fn confirm_release(versions: &ReleaseVersions, tag: &str) -> Result<bool> {
    println!(
        "\n{}",
        style("This will commit, push, tag and publish a release.").bold()
    );
    println!("  From: {}", style(&versions.old).red());
    println!("  To:   {}", style(&versions.new).green());
    println!("  Tag:  {}", style(tag).cyan());

    confirm_action("Continue with the release?")
}

pub fn parse_confirmation(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}
