//! # Terminal Output
//!
//! Styling for `dirpack` command output. Color and emoji use follow the
//! `--color=auto|always|never` flag; in `auto` mode the environment decides:
//!
//! - `NO_COLOR` (any value) turns styling off, see <https://no-color.org/>
//! - `CLICOLOR=0` turns it off, `CLICOLOR_FORCE=1` forces it on
//! - `TERM=dumb` turns it off
//! - otherwise styling is used when stdout is a color-capable terminal

use console::style;
use std::env;

/// Whether command output may use colors and emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag value against the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => detect_color_support(),
        };
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn styled() -> Self {
        Self { use_color: true }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

fn detect_color_support() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}

/// Pick the emoji when styling is on, the plain marker otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Label for an include/exclude decision, padded to a fixed width.
pub fn decision_label(config: &OutputConfig, excluded: bool) -> String {
    let label = if excluded { "excluded" } else { "included" };
    if !config.use_color {
        return label.to_string();
    }
    if excluded {
        style(label).red().force_styling(true).to_string()
    } else {
        style(label).green().force_styling(true).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
    }

    #[test]
    fn test_color_never() {
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    fn test_emoji_helper() {
        assert_eq!(emoji(&OutputConfig::styled(), "📦", "[OK]"), "📦");
        assert_eq!(emoji(&OutputConfig::plain(), "📦", "[OK]"), "[OK]");
    }

    #[test]
    fn test_decision_label() {
        assert_eq!(decision_label(&OutputConfig::plain(), true), "excluded");
        assert_eq!(decision_label(&OutputConfig::plain(), false), "included");

        let styled = decision_label(&OutputConfig::styled(), true);
        assert!(styled.contains("excluded"));
        assert!(styled.contains('\u{1b}'));
    }
}
