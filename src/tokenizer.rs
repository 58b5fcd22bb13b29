//! Splits a command line into argv-style tokens.
//!
//! Whitespace separates tokens. Single- and double-quoted spans join into one
//! token with the quotes removed. A backslash escapes the next character
//! outside single quotes: `\t`, `\n` and `\r` become the control characters
//! themselves, any other escaped character (a space, a quote, a backslash) is
//! taken literally.

use thiserror::Error;

/// A lexical defect in a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated {quote} quote starting at column {column}")]
    UnterminatedQuote { quote: char, column: usize },
    #[error("dangling escape at end of input")]
    DanglingEscape,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    SingleQuoted,
    DoubleQuoted,
}

/// Split `raw` into tokens.
///
/// An empty or all-whitespace line yields no tokens.
///
/// # Errors
///
/// Returns [`TokenizeError::UnterminatedQuote`] if a quote is never closed and
/// [`TokenizeError::DanglingEscape`] if the line ends in a lone backslash.
pub fn tokenize(raw: &str) -> Result<Vec<String>, TokenizeError> {
    let mut out = Vec::new();
    let mut current = String::new();
    // A quoted empty string ("") still counts as a token.
    let mut in_token = false;
    let mut mode = Mode::Normal;
    let mut quote_start = 0;
    let mut chars = raw.chars().enumerate();

    while let Some((column, ch)) = chars.next() {
        match mode {
            Mode::Normal => match ch {
                '\'' => {
                    mode = Mode::SingleQuoted;
                    quote_start = column;
                    in_token = true;
                }
                '"' => {
                    mode = Mode::DoubleQuoted;
                    quote_start = column;
                    in_token = true;
                }
                '\\' => {
                    let (_, next) = chars.next().ok_or(TokenizeError::DanglingEscape)?;
                    current.push(escaped(next));
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        out.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                _ => {
                    current.push(ch);
                    in_token = true;
                }
            },
            Mode::SingleQuoted => {
                if ch == '\'' {
                    mode = Mode::Normal;
                } else {
                    current.push(ch);
                }
            }
            Mode::DoubleQuoted => match ch {
                '"' => mode = Mode::Normal,
                '\\' => {
                    let (_, next) = chars.next().ok_or(TokenizeError::DanglingEscape)?;
                    current.push(escaped(next));
                }
                _ => current.push(ch),
            },
        }
    }

    match mode {
        Mode::Normal => {}
        Mode::SingleQuoted => {
            return Err(TokenizeError::UnterminatedQuote {
                quote: '\'',
                column: quote_start + 1,
            });
        }
        Mode::DoubleQuoted => {
            return Err(TokenizeError::UnterminatedQuote {
                quote: '"',
                column: quote_start + 1,
            });
        }
    }
    if in_token {
        out.push(current);
    }
    Ok(out)
}

/// Resolve backslash escapes in a single token that was already split, such
/// as an argument handed over by the operating system.
///
/// A trailing lone backslash is kept as is.
pub fn unescape(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => out.push(escaped(next)),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

const fn escaped(ch: char) -> char {
    match ch {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        other => other,
    }
}
