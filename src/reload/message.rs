//! Wire frame pushed to browsers.

use serde::Serialize;

/// JSON frame shaped like the LiveReload protocol's `reload` command, so
/// stock livereload clients keep working next to the embedded one.
#[derive(Debug, Serialize)]
pub struct ReloadMessage {
    command: &'static str,
    path: String,
    #[serde(rename = "liveCSS")]
    live_css: bool,
}

impl ReloadMessage {
    pub fn reload(path: &str) -> Self {
        Self {
            command: "reload",
            path: path.to_string(),
            live_css: true,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"command":"reload"}"#.to_string())
    }
}
