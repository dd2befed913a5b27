//! Colored message helpers for the shell.

use std::fmt;

use colored::Colorize;

pub fn info(message: impl fmt::Display) {
    println!("{}", message);
}

pub fn warning(message: impl fmt::Display) {
    println!("{}", message.to_string().bright_yellow());
}

pub fn error(message: impl fmt::Display) {
    println!("{}", message.to_string().bright_red());
}

pub fn hint(message: impl fmt::Display) {
    println!("{}", message.to_string().bright_cyan());
}

/// Sheet listings: one green, tab-separated line.
pub fn listing(message: impl fmt::Display) {
    println!("{}", message.to_string().bright_green());
}
