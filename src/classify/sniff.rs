// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Delimiter sniffing for tabular text
//!
//! A string counts as delimited data only when it has at least two lines
//! and one candidate delimiter appears the same number of times on every
//! line. Single-line strings are never tabular, however many commas they
//! contain.

/// Candidates in preference order
const DELIMITER_CANDIDATES: [char; 5] = [',', '\t', ';', '|', ':'];

/// Infer the delimiter of `text`, if it looks like consistent tabular data
pub(crate) fn sniff_delimiter(text: &str) -> Option<char> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return None;
    }

    DELIMITER_CANDIDATES.iter().copied().find(|&delimiter| {
        let first_count = lines[0].matches(delimiter).count();
        first_count > 0
            && lines
                .iter()
                .all(|line| line.matches(delimiter).count() == first_count)
    })
}
