//! Terminal output helpers

use colored::Colorize;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print an aligned `key: value` line
pub fn print_field(key: &str, value: &str) {
    println!("  {:<12} {}", format!("{}:", key).dimmed(), value);
}
