// src/logs.rs

//! Log viewer support.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::fs::FileSystem;

/// Shown when the log file does not exist.
pub const MISSING_LOGS: &str = "Logs were deleted?";

static ANSI_ESCAPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid ANSI regex"));

/// Contents of the log file as HTML, newest line first.
pub fn get_logs(fs: &dyn FileSystem, path: &Path) -> String {
    if !fs.is_file(path) {
        return MISSING_LOGS.to_string();
    }
    let contents = match fs.read_to_string(path) {
        Ok(c) => c,
        Err(err) => return escape_html(&format!("could not read logs: {err:#}")),
    };

    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| escape_html(&ANSI_ESCAPES.replace_all(line, "")))
        .collect();
    lines.reverse();
    lines.join("<br>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
