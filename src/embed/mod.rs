//! Embedded static resources.
//!
//! - `build/default.html`: the built-in reveal.js presentation template
//! - `serve/livereload.js`: the browser refresh client
//! - `init/`: sample fragments seeded by `deckard init`

/// Built-in presentation template, used when no `--template` is given.
pub const DEFAULT_TEMPLATE: &str = include_str!("build/default.html");

/// URL the injected script tag points at.
pub const LIVERELOAD_JS_URL: &str = "/__livereload.js";

const LIVERELOAD_JS: &str = include_str!("serve/livereload.js");

/// Livereload client with the WebSocket port substituted in.
pub fn livereload_js(ws_port: u16) -> String {
    LIVERELOAD_JS.replace("__DECKARD_WS_PORT__", &ws_port.to_string())
}

/// Script tag injected into served HTML pages.
pub fn livereload_script_tag() -> String {
    format!("<script src=\"{LIVERELOAD_JS_URL}\"></script>")
}

/// Sample fragments for a fresh presentation folder, in serve order.
pub const SAMPLE_FILES: [(&str, &str); 3] = [
    ("00_title.md", include_str!("init/00_title.md")),
    ("01_next_slides.md", include_str!("init/01_next_slides.md")),
    ("02_html_slides.html", include_str!("init/02_html_slides.html")),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_consumes_header_keys() {
        for key in ["title", "description", "author", "version", "plugins", "slides"] {
            assert!(
                DEFAULT_TEMPLATE.contains(&format!("{{{{ {key} }}}}")),
                "template lost its {{{{ {key} }}}} placeholder"
            );
        }
    }

    #[test]
    fn test_livereload_port_substitution() {
        let js = livereload_js(35729);
        assert!(js.contains("35729"));
        assert!(!js.contains("__DECKARD_WS_PORT__"));
    }

    #[test]
    fn test_sample_title_slide_has_valid_header() {
        let (name, text) = SAMPLE_FILES[0];
        assert_eq!(name, "00_title.md");
        crate::deck::metadata::read(text).unwrap();
    }
}
