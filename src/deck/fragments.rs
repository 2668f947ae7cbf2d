//! Content file discovery and ordering.

use std::fs;
use std::path::Path;

use crate::error::{BuildError, Result};

/// One source slide file, read in full.
#[derive(Debug, Clone)]
pub struct ContentFile {
    /// Bare filename, also the sort key and the `data-markdown` target.
    pub name: String,
    pub text: String,
}

/// Whether a filename contributes slides to the deck.
///
/// Only a file named exactly `index.html` is excluded (it is the output,
/// never an input); any name ending in `.md` is eligible, including one like
/// `weird.index.md`.
pub fn is_content_file(name: &str) -> bool {
    (name != "index.html" && name.ends_with(".html")) || name.ends_with(".md")
}

/// Collect the deck's content files, sorted ascending by filename.
///
/// The first file in the returned list is the title slide and must carry the
/// metadata header.
pub fn collect(dir: &Path) -> Result<Vec<ContentFile>> {
    if !dir.is_dir() {
        return Err(BuildError::NotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| BuildError::Io(dir.to_path_buf(), e))?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_content_file(name))
        .collect();

    if names.is_empty() {
        return Err(BuildError::EmptyInput(dir.to_path_buf()));
    }
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let path = dir.join(&name);
            let text = fs::read_to_string(&path).map_err(|e| BuildError::Io(path, e))?;
            Ok(ContentFile { name, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_eligibility() {
        assert!(is_content_file("00_title.md"));
        assert!(is_content_file("01_slide.html"));
        assert!(!is_content_file("index.html"));
        assert!(!is_content_file("notes.txt"));
        assert!(!is_content_file("style.css"));
        // only the exact output name is excluded
        assert!(is_content_file("weird.index.md"));
        assert!(!is_content_file("my_index.html"));
    }

    #[test]
    fn test_collect_sorted_and_excludes_output() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("01_b.html"), "b").unwrap();
        std::fs::write(tmp.path().join("00_a.md"), "a").unwrap();
        std::fs::write(tmp.path().join("index.html"), "out").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "skip").unwrap();

        let files = collect(tmp.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["00_a.md", "01_b.html"]);
        assert_eq!(files[0].text, "a");
    }

    #[test]
    fn test_collect_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("nope");
        assert!(matches!(collect(&gone), Err(BuildError::NotFound(_))));
    }

    #[test]
    fn test_collect_empty_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("index.html"), "out").unwrap();
        assert!(matches!(
            collect(tmp.path()),
            Err(BuildError::EmptyInput(_))
        ));
    }
}
