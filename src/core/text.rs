//! Text canonicalization for synthesis requests.
//!
//! Every piece of caller text passes through [`normalize_text`] before it is
//! validated against the voice catalog or sent upstream. The output is the
//! exact text the provider is asked to read aloud.

/// Maximum accepted byte length of normalized text
pub const MAX_TEXT_LEN: usize = 10_000;

/// Text validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("text is empty after normalization")]
    Empty,

    #[error("text too long: {len} > {max}")]
    TooLong { len: usize, max: usize },
}

/// Canonicalize caller-supplied text.
///
/// Line endings are unified to `\n`, control characters other than `\n` and
/// `\t` are dropped, trailing spaces and tabs are removed from each line and
/// runs of blank lines collapse to a single blank line. The result is trimmed
/// and must be non-empty and at most [`MAX_TEXT_LEN`] bytes.
pub fn normalize_text(input: &str) -> Result<String, TextError> {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = unified.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }

    let clean: String = trimmed
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || !(c < ' ' || c == '\u{7f}'))
        .collect();
    if clean.is_empty() {
        return Err(TextError::Empty);
    }

    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for line in clean.split('\n') {
        let line = line.trim_end_matches([' ', '\t']);
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            lines.push("");
            continue;
        }
        blank_run = 0;
        lines.push(line);
    }

    let result = lines.join("\n").trim().to_string();
    if result.is_empty() {
        return Err(TextError::Empty);
    }
    if result.len() > MAX_TEXT_LEN {
        return Err(TextError::TooLong {
            len: result.len(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(result)
}
