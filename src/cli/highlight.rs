//! `highlight` and `editor-css` commands.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ColorChoice;

use super::common::{read_input, stdout_colors};
use crate::mode::{ModeRegistry, TEXT};
use crate::debug;
use crate::theme::{EditorTheme, ThemeRegistry};

/// How tokens are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    /// One `line:kind@offset text` line per non-text token.
    Tokens,
    /// The input with ANSI colors from the theme.
    Colored,
    /// The input unchanged.
    Plain,
}

/// Highlight a log file with the logfile mode and theme.
pub fn highlight(path: &Path, tokens: bool, color: ColorChoice) -> Result<()> {
    let text = read_input(path)?;
    let output = match (tokens, stdout_colors(color)) {
        (true, _) => Output::Tokens,
        (false, true) => Output::Colored,
        (false, false) => Output::Plain,
    };

    let modes = ModeRegistry::with_builtin().context("Failed to compile built-in modes")?;
    let themes = ThemeRegistry::with_builtin();
    let rendered = render(&modes, &themes, &text, output)?;

    io::stdout().lock().write_all(rendered.as_bytes())?;
    Ok(())
}

/// Print the logfile theme stylesheet.
pub fn print_editor_css() -> Result<()> {
    let themes = ThemeRegistry::with_builtin();
    let theme = logfile_theme(&themes)?;
    io::stdout().lock().write_all(theme.to_css().as_bytes())?;
    Ok(())
}

fn logfile_theme(themes: &ThemeRegistry) -> Result<&EditorTheme> {
    themes
        .get(EditorTheme::LOGFILE)
        .ok_or_else(|| anyhow!("theme `{}` is not registered", EditorTheme::LOGFILE))
}

fn render(modes: &ModeRegistry, themes: &ThemeRegistry, text: &str, output: Output) -> Result<String> {
    let mode = modes
        .get(ModeRegistry::LOGFILE)
        .ok_or_else(|| anyhow!("mode `{}` is not registered", ModeRegistry::LOGFILE))?;
    let theme = logfile_theme(themes)?;
    debug!("highlight"; "mode {}, theme {}", mode.id(), theme.id);

    let mut out = String::with_capacity(text.len());
    for (index, tokens) in mode.tokenizer().tokenize(text).iter().enumerate() {
        match output {
            Output::Tokens => {
                for token in tokens.iter().filter(|t| t.kind != TEXT) {
                    let _ = writeln!(out, "{}:{}@{} {}", index + 1, token.kind, token.start, token.text);
                }
            }
            Output::Colored => {
                for token in tokens {
                    out.push_str(&theme.paint(token.kind, token.text));
                }
                out.push('\n');
            }
            Output::Plain => {
                for token in tokens {
                    out.push_str(token.text);
                }
                out.push('\n');
            }
        }
    }
    Ok(out)
}
