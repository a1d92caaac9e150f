//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::ReleaseWarning;
use crate::pipeline::{ReleaseReport, ReleaseStep};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the banner for a step, numbered from 1.
pub fn display_step_header(step: ReleaseStep) {
    println!(
        "\n{}",
        style(format!(
            "[{}/{}] {}",
            step_number(step),
            ReleaseStep::ALL.len(),
            step.description()
        ))
        .bold()
    );
}

/// Display what a dry run would do, step by step.
pub fn display_release_plan(plan: &[(ReleaseStep, Vec<String>)]) {
    println!("{}", style("Dry run, nothing will be changed:").bold());
    for (step, actions) in plan {
        println!("  {}. {}", step_number(*step), style(step.name()).underlined());
        for action in actions {
            println!("     - {}", action);
        }
    }
}

/// Display every step with its ignored failures.
pub fn display_release_summary(report: &ReleaseReport) {
    println!("\n{}", style(summary_title(report)).bold());
    for outcome in &report.outcomes {
        if outcome.is_clean() {
            println!("  {} {}", style("✓").green(), outcome.step);
        } else {
            println!(
                "  {} {} ({} warning(s))",
                style("⚠").yellow(),
                outcome.step,
                outcome.warnings.len()
            );
            for warning in &outcome.warnings {
                println!("      {}", warning);
            }
        }
    }
}

pub fn display_congratulations(tag: &str) {
    println!(
        "\n{} Congratulations, done! Released {}\n",
        style("✓").green(),
        style(tag).cyan()
    );
}

fn summary_title(report: &ReleaseReport) -> String {
    match report.warning_count() {
        0 => "Release summary:".to_string(),
        1 => "Release summary (1 warning):".to_string(),
        n => format!("Release summary ({} warnings):", n),
    }
}

fn step_number(step: ReleaseStep) -> usize {
    ReleaseStep::ALL
        .iter()
        .position(|s| *s == step)
        .map(|i| i + 1)
        .unwrap_or(0)
}
