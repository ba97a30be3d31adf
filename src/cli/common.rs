//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ColorChoice;

/// Read a whole input file, where `-` means stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Whether to emit ANSI colors on stdout for the given `--color` choice.
pub fn stdout_colors(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_input_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(read_input(&path).unwrap(), "{}");
        assert!(read_input(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_stdout_colors_explicit() {
        assert!(stdout_colors(ColorChoice::Always));
        assert!(!stdout_colors(ColorChoice::Never));
    }
}
