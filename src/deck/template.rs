//! `{{ key }}` template substitution.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::embed;
use crate::error::{BuildError, Result};

/// Where the presentation template comes from.
///
/// A file template is re-read on every rebuild, so editing it takes effect on
/// the next save just like editing a fragment.
#[derive(Debug, Clone)]
pub enum Template {
    /// Built-in reveal.js template.
    Embedded,
    /// User-supplied template file.
    File(PathBuf),
}

impl Template {
    pub fn load(&self) -> Result<Cow<'static, str>> {
        match self {
            Template::Embedded => Ok(Cow::Borrowed(embed::DEFAULT_TEMPLATE)),
            Template::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| BuildError::Io(path.clone(), e)),
        }
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder regex"));

/// Substitute `{{ key }}` placeholders with settings values.
///
/// One left-to-right scan: substituted values are never re-scanned, so output
/// does not depend on map iteration order. Keys missing from the settings
/// render as the empty string.
pub fn render(template: &str, settings: &FxHashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            settings.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
