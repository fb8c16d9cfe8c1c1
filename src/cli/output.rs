//! Colored terminal output for swstate commands.
//!
//! `colored` honors NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

/// `error: ...` on stderr.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Snapshot passed a check.
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// A snapshot was written to the path in `msg`.
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Queue label after an update.
pub fn diff_add(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "+".green(), msg);
}

/// Queue label before an update.
pub fn diff_remove(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "-".red(), msg);
}

/// Uncolored data: rendered trees, JSON, TOML.
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{msg}");
}
