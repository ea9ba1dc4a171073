// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! TRiD signature match output

use tracing::debug;

use super::contains_sentinel;
use crate::tools::ToolError;

/// Printed when TRiD was given nothing it could open (wording varies by release)
const NO_FILES: &[&str] = &["found no file(s) to analyze", "no files to analyze"];

/// Banner lines TRiD prints before the ranked matches.
///
/// This is a fixed count, not a detected boundary: a banner of a different
/// length shifts every match.
const HEADER_LINES: usize = 6;

/// Extract the ranked signature matches
///
/// Returns `None` when TRiD reports there was nothing to analyze, and a
/// single-element list holding the error text when the run failed.
pub fn parse_trid(output: &str, error: Option<&ToolError>) -> Option<Vec<String>> {
    if let Some(e) = error {
        return Some(vec![e.to_string()]);
    }

    let lines: Vec<&str> = output.split('\n').collect();
    debug!("TRiD lines: {:?}", lines);

    if NO_FILES.iter().any(|sentinel| contains_sentinel(&lines, sentinel)) {
        return None;
    }

    let matches = lines
        .iter()
        .skip(HEADER_LINES)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    Some(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\n\
TrID/32 - File Identifier v2.24 - (C) 2003-16 By M.Pontello\n\
Definitions found:  14925\n\
Analyzing...\n\
\n\
Collecting data from file: /tmp/ident_42\n\
 41.0% (.EXE) Win64 Executable (generic) (10523/12/4)\n\
 19.6% (.DLL) Win32 Dynamic Link Library (generic) (5012/54/2)\n\
\n\
 13.4% (.EXE) Win32 Executable (generic) (4505/5/1)\n\
";

    #[test]
    fn test_skips_banner_and_blank_lines_in_order() {
        assert_eq!(
            parse_trid(OUTPUT, None),
            Some(vec![
                "41.0% (.EXE) Win64 Executable (generic) (10523/12/4)".to_string(),
                "19.6% (.DLL) Win32 Dynamic Link Library (generic) (5012/54/2)".to_string(),
                "13.4% (.EXE) Win32 Executable (generic) (4505/5/1)".to_string(),
            ])
        );
    }

    #[test]
    fn test_no_files_sentinel_is_absent() {
        let out = "\nTrID/32 - File Identifier v2.24\nDefinitions found:  14925\nAnalyzing...\nError: found no file(s) to analyze!\n";
        assert_eq!(parse_trid(out, None), None);
    }

    #[test]
    fn test_plain_no_files_wording_is_absent() {
        let out = "\nTrID/32 - File Identifier v2.24\nDefinitions found:  14925\nAnalyzing...\n\n\nno files to analyze\n";
        assert_eq!(parse_trid(out, None), None);
    }

    #[test]
    fn test_tool_error_becomes_single_entry() {
        let err = ToolError::NotFound { program: "trid".to_string() };
        assert_eq!(
            parse_trid(OUTPUT, Some(&err)),
            Some(vec!["trid: executable file not found".to_string()])
        );
    }

    #[test]
    fn test_short_output_has_no_matches() {
        assert_eq!(parse_trid("a\nb\nc", None), Some(vec![]));
    }

    #[test]
    fn test_lines_after_header_are_kept_verbatim_otherwise() {
        let out = "1\n2\n3\n4\n5\n6\n  first  \nsecond";
        assert_eq!(parse_trid(out, None), Some(vec!["first".to_string(), "second".to_string()]));
    }
}
