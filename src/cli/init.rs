//! Seed a presentation folder with sample fragments.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::deck::fragments;
use crate::embed;
use crate::log;

/// Place the sample fragments, unless the folder already has content files.
pub fn run(folder: &Path) -> Result<()> {
    fs::create_dir_all(folder)
        .with_context(|| format!("failed to create {}", folder.display()))?;

    if has_content_files(folder)? {
        log!("init"; "content files already exist, not placing samples");
        return Ok(());
    }

    for (name, text) in embed::SAMPLE_FILES {
        fs::write(folder.join(name), text)
            .with_context(|| format!("failed to write {name}"))?;
    }
    log!("init"; "seeded {} with {} sample fragments", folder.display(), embed::SAMPLE_FILES.len());
    log!("init"; "run `deckard serve {}` to present", folder.display());
    Ok(())
}

fn has_content_files(folder: &Path) -> Result<bool> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("failed to read {}", folder.display()))?;
    Ok(entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .any(|name| fragments::is_content_file(&name)))
}
