//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::{unescape_indent, Settings};
use crate::domain::{DuplicatePolicy, Format};

/// Parse compact tree notation like 23:(45,56:(3)) and render it as indented text
#[derive(Parser, Debug)]
#[command(name = "treestr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a notation and print its rendering
    Render {
        /// Notation string; omitted or "-" reads stdin
        notation: Option<String>,
        #[command(flatten)]
        parse: ParseArgs,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Validate a notation and print its shape
    Check {
        /// Notation string; omitted or "-" reads stdin
        notation: Option<String>,
        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Render one notation per line of a file
    Batch {
        /// Input file; "-" reads stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Print a commented config template
    Template,
    /// Print the global config file location
    Path,
}

/// Parsing overrides.
#[derive(Args, Debug, Default)]
pub struct ParseArgs {
    /// Handling of sibling nodes sharing a label
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatePolicy>,

    /// Maximum nesting below the root (0 = unlimited)
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Rendering overrides.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Output format
    #[arg(short = 'F', long, value_enum)]
    pub format: Option<Format>,

    /// Indentation unit per level ("\t" = tab)
    #[arg(long)]
    pub indent: Option<String>,
}

impl ParseArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(duplicates) = self.duplicates {
            settings.parse.duplicates = duplicates;
        }
        if let Some(max_depth) = self.max_depth {
            settings.parse.max_depth = max_depth;
        }
    }
}

impl RenderArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(format) = self.format {
            settings.render.format = format;
        }
        if let Some(indent) = &self.indent {
            settings.render.indent = unescape_indent(indent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_render_flags_when_parsing_args_then_overrides_applied() {
        let cli = Cli::try_parse_from([
            "treestr",
            "render",
            "1:(2)",
            "-F",
            "notation",
            "--indent",
            "\\t\\t",
            "--duplicates",
            "last-wins",
            "--max-depth",
            "0",
        ])
        .unwrap();
        let Some(Commands::Render {
            notation,
            parse,
            render,
        }) = cli.command
        else {
            panic!("expected render command");
        };
        assert_eq!(notation.as_deref(), Some("1:(2)"));

        let mut settings = Settings::default();
        parse.apply(&mut settings);
        render.apply(&mut settings);
        assert_eq!(settings.render.format, Format::Notation);
        assert_eq!(settings.render.indent, "\t\t");
        assert_eq!(settings.parse.duplicates, DuplicatePolicy::LastWins);
        assert_eq!(settings.parse.max_depth, 0);
    }

    #[test]
    fn given_no_flags_when_applying_then_settings_unchanged() {
        let mut settings = Settings::default();
        ParseArgs::default().apply(&mut settings);
        RenderArgs::default().apply(&mut settings);
        assert_eq!(settings, Settings::default());
    }
}
