//! Deckard - a live-reloading presentation builder for reveal.js decks.

#![allow(dead_code)]

mod cli;
mod core;
mod deck;
mod embed;
mod error;
mod logger;
mod reload;
mod watch;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Serve {
            folder,
            port,
            build_args,
        } => {
            logger::set_verbose(build_args.verbose);
            cli::serve::run(&deck_folder(folder), *port, build_args.template())
        }
        Commands::Build { folder, build_args } => {
            logger::set_verbose(build_args.verbose);
            cli::build::run(&deck_folder(folder), build_args.template())
        }
        Commands::Init { folder } => cli::init::run(&deck_folder(folder)),
        Commands::Meta { folder, fields } => cli::meta::run(&deck_folder(folder), fields),
    }
}

/// Resolve the optional folder argument, defaulting to the current directory.
fn deck_folder(folder: &Option<PathBuf>) -> PathBuf {
    folder
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
}
