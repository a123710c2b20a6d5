//! Terminal detection.
//!
//! Decides whether swatches can be drawn with ANSI background colors, and at
//! what color depth.

use std::io::IsTerminal;

/// How colored swatches are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSupport {
    /// Plain text only.
    #[default]
    None,
    /// xterm 256-color palette (`48;5;n`).
    EightBit,
    /// 24-bit color (`48;2;r;g;b`).
    TrueColor,
}

impl ColorSupport {
    /// Lowercase name of the color support level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::EightBit => "256",
            Self::TrueColor => "truecolor",
        }
    }

    /// Whether any swatch colors are emitted.
    #[must_use]
    pub const fn is_colored(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug)]
struct EnvSettings {
    no_color: Option<String>,
    force_color: Option<String>,
    colorterm: Option<String>,
    term: Option<String>,
}

fn read_env_settings() -> EnvSettings {
    EnvSettings {
        no_color: std::env::var("NO_COLOR").ok(),
        force_color: std::env::var("FORCE_COLOR").ok(),
        colorterm: std::env::var("COLORTERM").ok(),
        term: std::env::var("TERM").ok(),
    }
}

/// Get the terminal width in cells.
///
/// Returns a default of 80 if the width cannot be determined.
#[must_use]
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .ok()
        .filter(|&(w, _)| w > 0)
        .map_or(80, |(w, _)| usize::from(w))
}

fn force_color_forces_terminal(force_color: Option<&str>) -> bool {
    force_color.is_some_and(|value| !value.is_empty())
}

/// Detect how swatches should be drawn on stdout.
///
/// - `NO_COLOR` (non-empty): no colors
/// - `FORCE_COLOR` (non-empty): treat stdout as a terminal
/// - `COLORTERM=truecolor|24bit`: truecolor
/// - `TERM=dumb|unknown`: no colors
/// - Otherwise: 256 colors on a terminal, none when piped
#[must_use]
pub fn detect_color_support() -> ColorSupport {
    detect_color_support_with(&read_env_settings(), std::io::stdout().is_terminal())
}

fn detect_color_support_with(env: &EnvSettings, is_tty: bool) -> ColorSupport {
    // https://no-color.org/
    if env
        .no_color
        .as_deref()
        .is_some_and(|value| !value.is_empty())
    {
        return ColorSupport::None;
    }

    let is_tty = is_tty || force_color_forces_terminal(env.force_color.as_deref());
    if !is_tty {
        return ColorSupport::None;
    }

    if let Some(colorterm) = env.colorterm.as_ref() {
        let colorterm = colorterm.trim().to_lowercase();
        if colorterm == "truecolor" || colorterm == "24bit" {
            return ColorSupport::TrueColor;
        }
    }

    let term = env
        .term
        .as_ref()
        .map(|value| value.trim().to_lowercase())
        .unwrap_or_default();
    if term == "dumb" || term == "unknown" {
        return ColorSupport::None;
    }

    ColorSupport::EightBit
}
