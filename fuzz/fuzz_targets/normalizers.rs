// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;

use identifier::normalizers::{parse_exiftool, parse_magic, parse_ssdeep, parse_trid};

// Tool output is untrusted text; none of the parsers may panic on it.
fuzz_target!(|data: &[u8]| {
    let output = String::from_utf8_lossy(data);

    let _ = parse_magic(&output, None);
    let _ = parse_ssdeep(&output, None);
    let _ = parse_trid(&output, None);
    let _ = parse_exiftool(&output, None);
});
