//! Title slide metadata header.
//!
//! The first content file opens with a fixed 7-line HTML comment:
//!
//! ```text
//! <!--
//! title:<value>
//! description:<value>
//! author:<value>
//! version:<value>
//! plugins:<comma-space-joined list>
//! -->
//! ```
//!
//! Each line must start with its literal prefix, in this order. Anything else
//! is a hard parse failure reported with the 1-based line number so the
//! author can fix the file, not a recoverable default.

use crate::error::{BuildError, Result};
use rustc_hash::FxHashMap;

pub const HEADER_LINES: usize = 7;

const PREFIXES: [&str; HEADER_LINES] = [
    "<!--",
    "title:",
    "description:",
    "author:",
    "version:",
    "plugins:",
    "-->",
];

/// The five editable header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub plugins: Vec<String>,
}

impl Metadata {
    /// Values for the five field lines, in header order.
    fn field_values(&self) -> [String; HEADER_LINES - 2] {
        [
            self.title.clone(),
            self.description.clone(),
            self.author.clone(),
            self.version.clone(),
            self.plugins.join(", "),
        ]
    }
}

fn check_line(line: &str, number: usize, expected: &'static str) -> Result<()> {
    if line.starts_with(expected) {
        return Ok(());
    }
    Err(BuildError::MalformedHeader {
        line: number,
        expected,
        actual: line.split_whitespace().next().unwrap_or("").to_string(),
    })
}

/// Validate the header and extract its fields.
pub fn read(text: &str) -> Result<Metadata> {
    let lines: Vec<&str> = text.lines().take(HEADER_LINES).collect();
    for (i, prefix) in PREFIXES.into_iter().enumerate() {
        check_line(lines.get(i).copied().unwrap_or(""), i + 1, prefix)?;
    }

    let value = |i: usize| lines[i][PREFIXES[i].len()..].trim().to_string();
    let plugins = value(5)
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Metadata {
        title: value(1),
        description: value(2),
        author: value(3),
        version: value(4),
        plugins,
    })
}

/// Rewrite the header fields in place, leaving everything after line 7 (and
/// every line terminator) untouched.
///
/// Re-validates against the text it is given, so a read-modify-write over a
/// file that changed in between still fails loudly instead of clobbering it.
pub fn write(text: &str, meta: &Metadata) -> Result<String> {
    let fields = meta.field_values();
    let mut out = String::with_capacity(text.len() + 64);
    let mut rest = text;

    for (i, prefix) in PREFIXES.into_iter().enumerate() {
        let end = rest.find('\n').map(|p| p + 1).unwrap_or(rest.len());
        let (raw, tail) = rest.split_at(end);
        let line = raw.trim_end_matches(['\r', '\n']);
        check_line(line, i + 1, prefix)?;

        out.push_str(prefix);
        if i > 0 && i < HEADER_LINES - 1 {
            out.push_str(&fields[i - 1]);
        }
        out.push_str(&raw[line.len()..]);
        rest = tail;
    }

    out.push_str(rest);
    Ok(out)
}

/// Build the template settings from the header block: every `key: value` line
/// up to (and excluding) the closing marker, values trimmed.
pub fn parse_settings(text: &str) -> FxHashMap<String, String> {
    let mut settings = FxHashMap::default();
    for raw in text.lines() {
        let line = raw.trim();
        if let Some((key, value)) = line.split_once(':') {
            settings.insert(key.to_string(), value.trim().to_string());
        }
        if line.starts_with("-->") {
            break;
        }
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "<!--\n\
        title:My talk\n\
        description:About things\n\
        author:Jo\n\
        version:5.2.1\n\
        plugins:markdown, notes\n\
        -->\n\
        \n\
        # Slide one\n";

    #[test]
    fn test_read() {
        let meta = read(HEADER).unwrap();
        assert_eq!(meta.title, "My talk");
        assert_eq!(meta.description, "About things");
        assert_eq!(meta.author, "Jo");
        assert_eq!(meta.version, "5.2.1");
        assert_eq!(meta.plugins, ["markdown", "notes"]);
    }

    #[test]
    fn test_read_wrong_case_names_line() {
        let bad = HEADER.replace("description:", "Description:");
        match read(&bad) {
            Err(BuildError::MalformedHeader {
                line,
                expected,
                actual,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, "description:");
                assert_eq!(actual, "Description:About");
            }
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_read_truncated_header() {
        match read("<!--\ntitle:Only\n") {
            Err(BuildError::MalformedHeader { line, expected, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, "description:");
            }
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_unchanged() {
        let meta = read(HEADER).unwrap();
        assert_eq!(write(HEADER, &meta).unwrap(), HEADER);
    }

    #[test]
    fn test_write_updates_fields_only() {
        let mut meta = read(HEADER).unwrap();
        meta.title = "New title".to_string();
        meta.plugins = vec!["highlight".to_string()];

        let updated = write(HEADER, &meta).unwrap();
        assert!(updated.contains("title:New title\n"));
        assert!(updated.contains("plugins:highlight\n"));
        // body after the header is untouched
        assert!(updated.ends_with("-->\n\n# Slide one\n"));
        // and the result still reads back
        assert_eq!(read(&updated).unwrap().title, "New title");
    }

    #[test]
    fn test_write_rejects_changed_file() {
        let meta = read(HEADER).unwrap();
        let tampered = HEADER.replace("author:", "contact:");
        assert!(matches!(
            write(&tampered, &meta),
            Err(BuildError::MalformedHeader { line: 4, .. })
        ));
    }

    #[test]
    fn test_write_keeps_crlf() {
        let crlf = HEADER.replace('\n', "\r\n");
        let meta = read(&crlf).unwrap();
        let updated = write(&crlf, &meta).unwrap();
        assert_eq!(updated, crlf);
    }

    #[test]
    fn test_parse_settings_stops_at_marker() {
        let settings = parse_settings(HEADER);
        assert_eq!(settings["title"], "My talk");
        assert_eq!(settings["plugins"], "markdown, notes");
        assert_eq!(settings.len(), 5);
    }
}
