//! Decorative terminal lines. Everything on stdout except `error`/`warn`
//! is suppressed when `UNIVERSITY_QUIET` is set.

use crate::output::is_quiet;
use crate::ui::{theme, Icons, Tone};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", icon, text.style(theme().style(Tone::Heading)));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().style(Tone::Ok)));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().style(Tone::Failure)));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().style(Tone::Caution)));
}

pub fn info(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().style(Tone::Accent)),
        label.style(theme().style(Tone::Faint)),
        value
    );
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().style(Tone::Heading)));
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", label.style(theme().style(Tone::Faint)), value);
}
