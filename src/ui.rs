//! Terminal output helpers: level-tinted messages, the banner and the
//! download spinner. Presentation only, nothing here affects install results.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;

use crate::channel::InstallChannel;
use crate::product;

#[derive(Debug, Clone, Copy)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

pub fn emit(level: Level, message: &str) {
    match level {
        Level::Info => println!("{} {}", "::".blue().bold(), message),
        Level::Success => println!("{} {}", "✓".green().bold(), message),
        Level::Warn => eprintln!("{} {}", "warning:".yellow().bold(), message),
        Level::Error => eprintln!("{} {}", "error:".red().bold(), message),
    }
}

pub fn info(message: impl AsRef<str>) {
    emit(Level::Info, message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    emit(Level::Success, message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    emit(Level::Warn, message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    emit(Level::Error, message.as_ref());
}

const TAGLINES: &[&str] = &[
    "charting a course to your toolchain",
    "one binary, zero ceremony",
    "pointing the way home",
    "north is wherever your PATH is",
];

pub fn banner(channel: InstallChannel) {
    let mut rng = rand::thread_rng();
    let tagline = TAGLINES.choose(&mut rng).copied().unwrap_or(TAGLINES[0]);
    println!();
    println!("  {}", format!("{} installer", product::NAME).bold());
    println!("  {}", tagline.dimmed().italic());
    println!();
    info(format!("release channel: {channel}"));
}

pub fn next_steps() {
    println!();
    println!("{}", "Next steps".bold());
    println!("  run `{}` to get started", product::BIN);
    println!("  docs live at {}", product::DOCS_URL);
}

pub fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap()
            .tick_chars("⠁⠉⠙⠚⠒⠂⠒⠲⠴⠤⠄⠤⠦⠖⠒⠐⠒⠓⠋⠉"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Clear the spinner line entirely so step output stays clean.
pub fn finish_spinner(pb: ProgressBar) {
    pb.finish_and_clear();
}
