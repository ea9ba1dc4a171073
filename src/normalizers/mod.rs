// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Normalizers for raw identification tool output
//!
//! Each normalizer takes the text a tool printed plus the error of the run
//! (if any) and turns it into a typed value. None of them fail: a tool error
//! becomes part of the value, and known "file absent" messages map to an
//! empty or absent value.

pub mod exiftool;
pub mod magic;
pub mod ssdeep;
pub mod trid;

pub use exiftool::parse_exiftool;
pub use magic::parse_magic;
pub use ssdeep::parse_ssdeep;
pub use trid::parse_trid;

/// Check whether any line contains the given sentinel text
pub(crate) fn contains_sentinel(lines: &[&str], sentinel: &str) -> bool {
    lines.iter().any(|line| line.contains(sentinel))
}
