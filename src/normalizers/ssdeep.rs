// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! ssdeep fuzzy hash output
//!
//! ssdeep prints a `ssdeep,1.1--blocksize:hash:hash,filename` header line
//! followed by one `hash,"path"` line per input file.

use tracing::debug;

use super::contains_sentinel;
use crate::tools::ToolError;

/// Printed when the input file is missing
const MISSING_FILE: &str = "No such file or directory";

/// Line holding the hash of the single input file
const HASH_LINE: usize = 1;

/// Extract the fuzzy hash, or the tool error text
pub fn parse_ssdeep(output: &str, error: Option<&ToolError>) -> String {
    if let Some(e) = error {
        return e.to_string();
    }

    let lines: Vec<&str> = output.split('\n').collect();
    debug!("ssdeep lines: {:?}", lines);

    if contains_sentinel(&lines, MISSING_FILE) {
        return String::new();
    }

    lines
        .get(HASH_LINE)
        .and_then(|line| line.split(',').next())
        .map(|hash| hash.trim().to_string())
        .unwrap_or_default()
}
