//! Slide markup assembly.
//!
//! HTML fragments pass through verbatim; Markdown fragments are wrapped in a
//! `<section data-markdown=...>` element so reveal.js fetches and splits them
//! in the browser.

use super::fragments::ContentFile;

/// Separator regexes written verbatim into the section attributes: a line of
/// `===` starts a new horizontal slide, a line of `---` a vertical one.
pub(crate) const SEPARATOR: &str = r"^\r?\n===\r?\n$";
pub(crate) const SEPARATOR_VERTICAL: &str = r"^\r?\n---\r?\n$";

/// Concatenate the fragments, in order, into the `slides` markup.
pub fn build_slides(files: &[ContentFile]) -> String {
    let mut slides = String::new();
    for file in files {
        if file.name.ends_with(".html") {
            slides.push_str(&file.text);
        } else {
            slides.push_str(&format!(
                "<section data-markdown=\"{}\" data-separator={SEPARATOR} data-separator-vertical={SEPARATOR_VERTICAL}>\n",
                file.name
            ));
            slides.push_str(&file.text);
            slides.push_str("\n</section>\n");
        }
    }
    slides
}
