//! Editor color themes.
//!
//! A theme maps token kinds to styles. It renders either to the
//! stylesheet the editor loads (`.ace-logfile .ace_<kind> { ... }`) or to
//! ANSI colors for terminal output.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use rustc_hash::FxHashMap;

/// Visual style of one token kind. Colors are `#rrggbb`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<&'static str>,
    pub background: Option<&'static str>,
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    pub const fn color(color: &'static str) -> Self {
        Self {
            color: Some(color),
            background: None,
            bold: false,
            italic: false,
        }
    }

    pub const fn on(mut self, background: &'static str) -> Self {
        self.background = Some(background);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn css_declarations(&self) -> String {
        let mut out = String::new();
        if let Some(color) = self.color {
            let _ = write!(out, " color: {color};");
        }
        if let Some(background) = self.background {
            let _ = write!(out, " background-color: {background};");
        }
        if self.bold {
            out.push_str(" font-weight: bold;");
        }
        if self.italic {
            out.push_str(" font-style: italic;");
        }
        out
    }

    fn to_ansi(self) -> owo_colors::Style {
        let mut style = owo_colors::Style::new();
        if let Some((r, g, b)) = self.color.and_then(parse_hex) {
            style = style.truecolor(r, g, b);
        }
        if let Some((r, g, b)) = self.background.and_then(parse_hex) {
            style = style.on_truecolor(r, g, b);
        }
        if self.bold {
            style = style.bold();
        }
        if self.italic {
            style = style.italic();
        }
        style
    }
}

/// Parse `#rrggbb`.
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// A named editor theme.
#[derive(Debug, Clone)]
pub struct EditorTheme {
    pub id: &'static str,
    pub css_class: &'static str,
    pub is_dark: bool,
    pub background: &'static str,
    pub foreground: &'static str,
    pub gutter: &'static str,
    pub selection: &'static str,
    /// Styles by token kind, in stylesheet order.
    pub styles: Vec<(&'static str, Style)>,
}

impl EditorTheme {
    pub const LOGFILE: &'static str = "ace/theme/logfile";

    /// Light theme for the `ace/mode/logfile` tokens.
    pub fn logfile() -> Self {
        Self {
            id: Self::LOGFILE,
            css_class: "ace-logfile",
            is_dark: false,
            background: "#ffffff",
            foreground: "#363636",
            gutter: "#f5f5f5",
            selection: "#c8e4f5",
            styles: vec![
                ("stacktrace", Style::color("#8b8d8f").italic()),
                ("caused-by", Style::color("#a30000").bold()),
                ("timestamp", Style::color("#3f9c35")),
                ("category", Style::color("#0088ce")),
                ("level-trace", Style::color("#8b8d8f")),
                ("level-debug", Style::color("#39a5dc")),
                ("level-info", Style::color("#00659c").bold()),
                ("level-warn", Style::color("#ec7a08").bold()),
                ("level-error", Style::color("#cc0000").bold()),
                ("level-fatal", Style::color("#ffffff").on("#a30000").bold()),
                ("exception", Style::color("#cc0000")),
                ("thread", Style::color("#703fec")),
            ],
        }
    }

    pub fn style_for(&self, kind: &str) -> Option<&Style> {
        self.styles
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|(_, style)| style)
    }

    /// Stylesheet loaded by the editor when the theme is selected.
    pub fn to_css(&self) -> String {
        let class = self.css_class;
        let mut css = String::new();
        let tone = if self.is_dark { "dark" } else { "light" };
        let _ = writeln!(css, "/* {} ({tone}) */", self.id);
        let _ = writeln!(
            css,
            ".{class} {{ background-color: {}; color: {}; }}",
            self.background, self.foreground
        );
        let _ = writeln!(
            css,
            ".{class} .ace_gutter {{ background: {}; color: {}; }}",
            self.gutter, self.foreground
        );
        let _ = writeln!(
            css,
            ".{class} .ace_marker-layer .ace_selection {{ background: {}; }}",
            self.selection
        );
        let _ = writeln!(css, ".{class} .ace_cursor {{ color: {}; }}", self.foreground);
        for (kind, style) in &self.styles {
            let _ = writeln!(css, ".{class} .ace_{kind} {{{} }}", style.css_declarations());
        }
        css
    }

    /// Render `text` in the style of `kind` with ANSI escapes.
    /// Kinds without a style are returned unchanged.
    pub fn paint(&self, kind: &str, text: &str) -> String {
        match self.style_for(kind) {
            Some(style) => text.style(style.to_ansi()).to_string(),
            None => text.to_string(),
        }
    }
}

/// Themes by id (e.g. `ace/theme/logfile`).
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    themes: FxHashMap<String, EditorTheme>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(EditorTheme::logfile());
        registry
    }

    /// Register `theme` under its id, replacing any previous theme.
    pub fn register(&mut self, theme: EditorTheme) {
        self.themes.insert(theme.id.to_string(), theme);
    }

    pub fn get(&self, id: &str) -> Option<&EditorTheme> {
        self.themes.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::LogFileHighlightRules;

    #[test]
    fn test_css_rule_per_token_kind() {
        let css = EditorTheme::logfile().to_css();
        for kind in LogFileHighlightRules::token_kinds() {
            let selector = format!(".ace-logfile .ace_{kind} {{");
            assert_eq!(css.matches(&selector).count(), 1, "{kind}");
        }
    }

    #[test]
    fn test_css_declarations() {
        let css = EditorTheme::logfile().to_css();
        assert!(css.starts_with(
            "/* ace/theme/logfile (light) */\n.ace-logfile { background-color: #ffffff; color: #363636; }"
        ));
        assert!(css.contains(
            ".ace-logfile .ace_level-fatal { color: #ffffff; background-color: #a30000; font-weight: bold; }"
        ));
        assert!(css.contains(".ace-logfile .ace_stacktrace { color: #8b8d8f; font-style: italic; }"));
    }

    #[test]
    fn test_style_for() {
        let theme = EditorTheme::logfile();
        assert_eq!(theme.style_for("timestamp"), Some(&Style::color("#3f9c35")));
        assert!(theme.style_for("text").is_none());
    }

    #[test]
    fn test_paint() {
        let theme = EditorTheme::logfile();
        assert_eq!(theme.paint("text", "plain"), "plain");
        let painted = theme.paint("level-error", "ERROR");
        assert!(painted.contains("ERROR"));
        assert!(painted.contains("\x1b["));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#cc0000"), Some((0xcc, 0, 0)));
        assert_eq!(parse_hex("cc0000"), None);
        assert_eq!(parse_hex("#ccc"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn test_registry() {
        let registry = ThemeRegistry::with_builtin();
        let theme = registry.get("ace/theme/logfile").unwrap();
        assert_eq!(theme.css_class, "ace-logfile");
        assert!(!theme.is_dark);
        assert!(registry.get("ace/theme/monokai").is_none());
    }
}
