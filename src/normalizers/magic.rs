// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! libmagic classification (`file --mime-type` and `file`)

use crate::tools::ToolError;

/// Normalize one `file` run; an error becomes the field value
pub fn parse_magic(output: &str, error: Option<&ToolError>) -> String {
    match error {
        Some(e) => e.to_string(),
        None => output.trim().to_string(),
    }
}
