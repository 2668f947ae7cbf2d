//! Show or update the title slide metadata header.
//!
//! Reads the header from the first content file; with any field flag given,
//! rewrites it in place. The write path re-reads the file and re-validates
//! the header right before mutating, so a concurrent edit fails loudly
//! instead of being clobbered.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::args::MetaArgs;
use crate::deck::{fragments, metadata};
use crate::error::BuildError;
use crate::log;

pub fn run(folder: &Path, fields: &MetaArgs) -> Result<()> {
    let (path, text) = title_slide(folder)?;
    let mut meta = metadata::read(&text)?;

    if !fields.is_update() {
        println!("title: {}", meta.title);
        println!("description: {}", meta.description);
        println!("author: {}", meta.author);
        println!("version: {}", meta.version);
        println!("plugins: {}", meta.plugins.join(", "));
        return Ok(());
    }

    if let Some(title) = &fields.title {
        meta.title = title.clone();
    }
    if let Some(description) = &fields.description {
        meta.description = description.clone();
    }
    if let Some(author) = &fields.author {
        meta.author = author.clone();
    }
    if let Some(version) = &fields.version {
        meta.version = version.clone();
    }
    if let Some(plugins) = &fields.plugins {
        meta.plugins = plugins.iter().map(|p| p.trim().to_string()).collect();
    }

    // re-read and re-validate against whatever is on disk right now
    let current = fs::read_to_string(&path).map_err(|e| BuildError::Io(path.clone(), e))?;
    let updated = metadata::write(&current, &meta)?;
    fs::write(&path, updated).map_err(|e| BuildError::Io(path.clone(), e))?;

    log!("meta"; "updated header in {}", path.display());
    Ok(())
}

/// First content file in sort order, the one carrying the header.
fn title_slide(folder: &Path) -> Result<(PathBuf, String)> {
    let files = fragments::collect(folder)?;
    let first = &files[0];
    Ok((folder.join(&first.name), first.text.clone()))
}
