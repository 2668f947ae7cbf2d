//! Deck assembly: fragments → settings → rendered `index.html`.
//!
//! A rebuild is one full pass: collect and order the content files, validate
//! the title slide header, build the settings mapping, assemble the slide
//! markup, substitute it all into the template, and write the output. The
//! document is assembled completely in memory before anything touches disk,
//! so a failed rebuild leaves the previous output intact.

use std::fs;
use std::path::Path;

pub mod assemble;
pub mod fragments;
pub mod metadata;
pub mod template;

pub use fragments::ContentFile;
pub use metadata::Metadata;
pub use template::Template;

use crate::error::{BuildError, Result};

/// The rendered document, always written next to the fragments.
pub const OUTPUT_FILE: &str = "index.html";

/// Run one full rebuild of the deck in `dir`.
pub fn rebuild(dir: &Path, template: &Template) -> Result<()> {
    let files = fragments::collect(dir)?;

    // Validate the title slide header before any output is produced.
    metadata::read(&files[0].text)?;

    let mut settings = metadata::parse_settings(&files[0].text);
    settings.insert("slides".to_string(), assemble::build_slides(&files));

    let html = template::render(&template.load()?, &settings);

    let output = dir.join(OUTPUT_FILE);
    fs::write(&output, html).map_err(|e| BuildError::Io(output, e))
}
