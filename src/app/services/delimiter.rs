//! Delimiter detection for pasted export text
//!
//! Export text arrives with no declared delimiter: the game itself emits
//! tab-separated rows, but spreadsheet round-trips produce comma or
//! semicolon variants. Detection inspects a single line (the header row)
//! and picks the most frequent candidate.

use tracing::debug;

use crate::constants::{DEFAULT_DELIMITER, DELIMITER_CANDIDATES};

/// Detect the most probable field delimiter of `line`.
///
/// Counts tab, comma and semicolon occurrences and returns the most
/// frequent. Ties break in fixed priority tab > comma > semicolon; this
/// ordering is load-bearing for compatibility with previously stored text
/// and must not change. Empty input or no delimiter present returns tab,
/// the game's native separator.
pub fn detect_delimiter(line: &str) -> char {
    let mut best = DEFAULT_DELIMITER;
    let mut best_count = 0usize;

    // Candidates are in tie-break priority order, so a later candidate
    // must strictly exceed the current best to win.
    for &candidate in DELIMITER_CANDIDATES {
        let count = line.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    debug!(delimiter = ?best, count = best_count, "detected delimiter");
    best
}
