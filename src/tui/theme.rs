//! Color output policy and the mapping from widget colors to terminal styles.

use std::env;

use ratatui::style::{Color as TermColor, Style};

use super::model::Color;

/// Color output mode for compatibility with `NO_COLOR` and terminal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Enabled,
    Disabled,
}

impl ColorMode {
    #[must_use]
    pub const fn from_no_color_flag(no_color: bool) -> Self {
        if no_color {
            Self::Disabled
        } else {
            Self::Enabled
        }
    }

    /// `NO_COLOR` set (to anything) or an explicit flag disables color.
    #[must_use]
    pub fn from_environment(flag: bool) -> Self {
        Self::from_no_color_flag(flag || env::var_os("NO_COLOR").is_some())
    }

    #[must_use]
    pub const fn no_color(self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Terminal color for a widget color, or `None` when color is off.
    #[must_use]
    pub const fn resolve(self, color: Color) -> Option<TermColor> {
        if self.no_color() {
            return None;
        }
        Some(match color {
            Color::Black => TermColor::Black,
            Color::White => TermColor::White,
            Color::Red => TermColor::Red,
            Color::Green => TermColor::Green,
            Color::Yellow => TermColor::Yellow,
            Color::Blue => TermColor::Blue,
            Color::Magenta => TermColor::Magenta,
            Color::Cyan => TermColor::Cyan,
        })
    }

    /// Foreground-only style; plain when color is off.
    #[must_use]
    pub fn fg(self, color: Color) -> Style {
        self.resolve(color)
            .map_or_else(Style::default, |c| Style::default().fg(c))
    }

    /// Foreground on background; plain when color is off.
    #[must_use]
    pub fn fg_on(self, fg: Color, bg: Color) -> Style {
        match (self.resolve(fg), self.resolve(bg)) {
            (Some(fg), Some(bg)) => Style::default().fg(fg).bg(bg),
            _ => Style::default(),
        }
    }
}
