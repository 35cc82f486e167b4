use colored::Colorize;
use std::io::{self, Write};

/// Announce a tracker step as `[position/total] message ...`
pub fn step_started(position: usize, total: usize, message: &str) {
    println!(
        "{} {} ... ",
        step_counter(position, total).yellow(),
        message.bright_white()
    );
    let _ = io::stdout().flush();
}

/// One-based step counter, padded to the width of the total
fn step_counter(position: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("[{position:>width$}/{total}]")
}

/// Print a success message
pub fn success_message(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

/// Print a warning message
pub fn warning_message(message: &str) {
    println!("{} {}", "⚠️ ".yellow(), message.yellow());
}

/// Print an error message
pub fn error_message(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red().bold());
}

/// Print a section header to separate logical sections of output
pub fn section_header(title: &str) {
    println!("\n{}", format!("==== {} ====", title).cyan().bold());
}

/// Print a simple informational message
pub fn info_message(message: &str) {
    println!("{} {}", "ℹ️ ".blue(), message.blue());
}

/// Print a checked label/value line, used for report totals
pub fn total_line(label: &str, value: &str) {
    println!("  {} {}: {}", "☑".green(), label.bold(), value.bright_white().bold());
}
