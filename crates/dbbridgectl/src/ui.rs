//! Terminal prompt helpers.

use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Yes/no confirmation. Empty input takes the default; otherwise only
/// `y`/`yes` confirms.
pub fn confirm(question: &str, default_yes: bool) -> io::Result<bool> {
    let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
    print!("{} {} ", question.bright_white(), suffix.dimmed());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(interpret_confirm_input(&input, default_yes))
}

fn interpret_confirm_input(input: &str, default_yes: bool) -> bool {
    let input = input.trim();

    if input.is_empty() {
        return default_yes;
    }

    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

/// Free-text question, trimmed.
pub fn ask(question: &str) -> io::Result<String> {
    print!("{} ", question.bright_white());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn heading(text: &str) {
    println!("{}", text.bright_white().bold());
    println!("{}", "=".repeat(text.len()).dimmed());
    println!();
}

pub fn info(text: &str) {
    println!("{}", text);
}

pub fn success(text: &str) {
    println!("{} {}", "✓".green().bold(), text);
}

pub fn warn(text: &str) {
    println!("{} {}", "!".yellow().bold(), text.yellow());
}

pub fn error(text: &str) {
    eprintln!("{} {}", "✗".red().bold(), text.red());
}
