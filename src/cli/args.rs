//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::deck::Template;

/// Deckard presentation server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the presentation with live reload
    #[command(visible_alias = "s")]
    Serve {
        /// Presentation folder (defaults to the current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        folder: Option<PathBuf>,

        /// Port of the web server
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Assemble index.html once and exit
    #[command(visible_alias = "b")]
    Build {
        /// Presentation folder (defaults to the current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        folder: Option<PathBuf>,

        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Seed a folder with sample slide fragments
    #[command(visible_alias = "i")]
    Init {
        /// Folder to seed (defaults to the current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        folder: Option<PathBuf>,
    },

    /// Show or update the title slide metadata header
    #[command(visible_alias = "m")]
    Meta {
        /// Presentation folder (defaults to the current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        folder: Option<PathBuf>,

        #[command(flatten)]
        fields: MetaArgs,
    },
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Template file with {{key}} placeholders (default: built-in reveal.js template)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub template: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub fn template(&self) -> Template {
        match &self.template {
            Some(path) => Template::File(path.clone()),
            None => Template::Embedded,
        }
    }
}

/// Metadata header fields settable from the command line.
#[derive(clap::Args, Debug, Clone)]
pub struct MetaArgs {
    /// New presentation title
    #[arg(long)]
    pub title: Option<String>,

    /// New presentation description
    #[arg(long)]
    pub description: Option<String>,

    /// New author name
    #[arg(long)]
    pub author: Option<String>,

    /// New reveal.js version
    #[arg(long)]
    pub version: Option<String>,

    /// New plugin list (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub plugins: Option<Vec<String>>,
}

impl MetaArgs {
    /// Whether any field was given (otherwise the command only prints).
    pub fn is_update(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.author.is_some()
            || self.version.is_some()
            || self.plugins.is_some()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::parse_from(["deckard", "serve", "talk", "-p", "9000"]);
        match cli.command {
            Commands::Serve { folder, port, .. } => {
                assert_eq!(folder.unwrap(), std::path::PathBuf::from("talk"));
                assert_eq!(port, 9000);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_meta_update() {
        let cli = Cli::parse_from(["deckard", "meta", "--plugins", "notes, highlight"]);
        match cli.command {
            Commands::Meta { fields, .. } => {
                assert!(fields.is_update());
                let plugins = fields.plugins.unwrap();
                assert_eq!(plugins.len(), 2);
            }
            other => panic!("expected meta, got {other:?}"),
        }
    }
}
