// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! exiftool metadata output

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

use super::contains_sentinel;
use crate::tools::ToolError;

/// Printed when exiftool could not open the input
const FILE_NOT_FOUND: &str = "File not found";

/// Tags describing our temporary copy rather than the file itself
const IGNORED_TAGS: &[&str] = &[
    "Directory",
    "File Name",
    "File Permissions",
    "File Modification Date/Time",
];

/// Parse `Tag Name : value` lines into a map keyed by camel-cased tag name
///
/// Returns `None` when exiftool could not find the file, and
/// `{"error": text}` when the run failed. Lines with zero or several colons
/// are skipped, which also drops most date/time values.
pub fn parse_exiftool(output: &str, error: Option<&ToolError>) -> Option<BTreeMap<String, String>> {
    if let Some(e) = error {
        let mut tags = BTreeMap::new();
        tags.insert("error".to_string(), e.to_string());
        return Some(tags);
    }

    let lines: Vec<&str> = output.split('\n').collect();
    debug!("Exiftool lines: {:?}", lines);

    if contains_sentinel(&lines, FILE_NOT_FOUND) {
        return None;
    }

    let mut tags = BTreeMap::new();
    for line in lines {
        let parts: Vec<&str> = line.split(':').collect();
        let [key, value] = parts.as_slice() else {
            continue;
        };
        if IGNORED_TAGS.contains(&key.trim()) {
            continue;
        }
        tags.insert(camel_case(key).trim().to_string(), value.trim().to_string());
    }

    Some(tags)
}

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new("[0-9A-Za-z]+").expect("valid word regex"));

/// Join alphanumeric runs, capitalizing every run after the first
///
/// `File Size` becomes `FileSize`, `MIME Type` stays `MIMEType`.
pub fn camel_case(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for (idx, word) in RE_WORD.find_iter(src).enumerate() {
        let word = word.as_str();
        if idx == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
