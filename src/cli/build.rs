//! One-shot build command.

use std::path::Path;

use anyhow::Result;

use crate::deck::{self, Template};
use crate::log;

/// Assemble `index.html` once; errors propagate to the exit code.
pub fn run(folder: &Path, template: Template) -> Result<()> {
    deck::rebuild(folder, &template)?;
    log!("build"; "wrote {}", folder.join(deck::OUTPUT_FILE).display());
    Ok(())
}
