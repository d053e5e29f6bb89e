//! Line splitting for IPPcode24 source text.
//!
//! IPPcode24 is strictly line-oriented and whitespace-separated; string
//! literals encode spaces as decimal escapes, so a plain word split is
//! lossless.

/// Split one source line into words, with the `#` comment stripped.
///
/// Returns an empty Vec for blank and comment-only lines.
pub(crate) fn split_line(line: &str) -> Vec<&str> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.split_whitespace().collect()
}
