//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// HAL console asset pipeline and runtime shims
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hal.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "hal.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Active theme (overrides $HAL_THEME and [theme] name)
    #[arg(short, long, global = true)]
    pub theme: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run pipeline tasks or aliases (dev, prod, css)
    #[command(visible_alias = "r")]
    Run {
        /// Tasks to run in order, e.g. `clean copy:resources less`
        #[arg(value_name = "TASK", default_value = "dev")]
        tasks: Vec<String>,
    },

    /// Recompile LESS whenever a source changes
    #[command(visible_alias = "w")]
    Watch,

    /// Serve a directory over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on (default: $PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve (default: the public directory)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Resolve a `theme:` module specifier
    Resolve {
        /// Specifier, e.g. `theme:/css/logo.css` or `theme:./local.css`
        specifier: String,

        /// File containing the import
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        from: PathBuf,
    },

    /// Print a log file highlighted with the logfile editor mode
    #[command(visible_alias = "hl")]
    Highlight {
        /// Log file (`-` reads stdin)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Print one `line:kind@offset text` line per token instead of colors
        #[arg(long)]
        tokens: bool,
    },

    /// Print the logfile editor theme stylesheet
    EditorCss,

    /// Synchronize documents into the local document store
    Sync {
        /// Database name
        #[arg(short, long)]
        database: String,

        /// Store directory (default: [sync] path)
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        db: Option<PathBuf>,

        /// JSON file holding one document or an array of documents (`-` reads stdin)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_short_flag() {
        let cli = Cli::try_parse_from(["hal-assets", "-v", "editor-css"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::EditorCss));

        let cli = Cli::try_parse_from(["hal-assets", "editor-css", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["hal-assets", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
