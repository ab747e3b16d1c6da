use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// What a piece of terminal text is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Ok,
    Failure,
    Caution,
    Accent,
    Faint,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colored: bool,
}

impl Theme {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn style(&self, tone: Tone) -> Style {
        if !self.colored {
            return Style::new();
        }
        match tone {
            Tone::Heading => Style::new().cyan().bold(),
            Tone::Ok => Style::new().green().bold(),
            Tone::Failure => Style::new().red().bold(),
            Tone::Caution => Style::new().yellow().bold(),
            Tone::Accent => Style::new().magenta(),
            Tone::Faint => Style::new().white().dimmed(),
        }
    }
}

/// Colored only when stdout is a terminal and `NO_COLOR`/`CLICOLOR` allow it
pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        Theme::new(console::colors_enabled() && console::Term::stdout().is_term())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_adds_no_escapes() {
        let plain = Theme::new(false);
        assert!(!plain.is_colored());
        let text = format!("{}", "Mathematics".style(plain.style(Tone::Heading)));
        assert_eq!(text, "Mathematics");
    }

    #[test]
    fn test_colored_theme_wraps_text() {
        let colored = Theme::new(true);
        let text = format!("{}", "Alice".style(colored.style(Tone::Failure)));
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("Alice"));
    }
}
