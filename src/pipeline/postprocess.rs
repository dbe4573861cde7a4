//! Markup normalisation: fix the line structure of rendered markup before
//! block assembly.
//!
//! Cell values and runs keep whatever line breaks the authoring application
//! stored. A lone `\r` inside a multi-line paragraph is invisible to a
//! `\n`-based line cursor, so the two halves would be fused into one block;
//! a BOM pasted in front of the first cell would stop the opening `|` from
//! starting a table. Both are repaired here.
//!
//! Only line structure is touched. Characters inside a line, including
//! zero-width joiners, non-joiners and soft hyphens, are content and pass
//! through unchanged.

/// Normalise rendered markup.
///
/// - `\r\n` and lone `\r` become `\n`
/// - a byte-order mark at the very start is dropped
/// - trailing whitespace is trimmed from every line
/// - runs of blank lines collapse to a single blank line, and leading blank
///   lines are dropped
/// - the result ends with exactly one `\n` (an empty input stays empty)
pub fn normalise_markup(input: &str) -> String {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);

    let mut out = String::with_capacity(input.len() + 1);
    let mut pending_blank = false;
    for line in split_lines(input) {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Split on `\r\n`, `\n` and lone `\r`.
fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    input
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}
