//! Markup escaping for the two output formats.
//!
//! RST fragments embed everything inside literal blocks, so RST escaping is
//! the identity. Troff needs every `-` written as `\-`, otherwise the
//! formatter may typeset option dashes as hyphens.
//!
//! Text that has already been turned into troff is carried as [`RoffText`].
//! Raw strings can only become `RoffText` through [`escape_troff`], so text
//! is never escaped twice by accident.

use std::fmt;

/// Text already in troff form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoffText(String);

impl RoffText {
    /// Empty troff text.
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Wraps a request or macro line written by this crate, e.g. `.SH NAME`.
    ///
    /// Only for literal troff produced here; user-supplied text must go
    /// through [`escape_troff`].
    pub(crate) fn request(line: &str) -> Self {
        let mut text = line.to_string();
        text.push('\n');
        Self(text)
    }

    /// Appends more troff text.
    pub fn push(&mut self, other: &RoffText) {
        self.0.push_str(&other.0);
    }

    /// Appends a line break.
    pub fn newline(&mut self) {
        self.0.push('\n');
    }

    /// Appends literal troff written by this crate, without a newline.
    pub(crate) fn push_literal(&mut self, text: &str) {
        self.0.push_str(text);
    }

    /// Appends a literal macro line (with trailing newline).
    pub(crate) fn push_request(&mut self, line: &str) {
        self.0.push_str(line);
        self.0.push('\n');
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if there is no text.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the wrapper.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoffText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for RoffText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Escapes text for an RST literal block (identity).
pub fn escape_rst(text: &str) -> String {
    text.to_string()
}

/// Escapes text for troff by writing every `-` as `\-`.
///
/// Not idempotent: escaping already-escaped text escapes its hyphens again.
///
/// # Examples
///
/// ```
/// use command_docs_render::escape_troff;
///
/// assert_eq!(escape_troff("a-b").as_str(), "a\\-b");
/// assert_eq!(escape_troff("").as_str(), "");
/// ```
pub fn escape_troff(text: &str) -> RoffText {
    RoffText(text.replace('-', "\\-"))
}

/// Escapes a multi-line block for troff.
///
/// Like [`escape_troff`], and additionally guards lines starting with `.`
/// or `'` with `\&` so troff does not read them as requests.
pub fn escape_troff_block(text: &str) -> RoffText {
    let mut out = String::with_capacity(text.len() + 16);
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if line.starts_with('.') || line.starts_with('\'') {
            out.push_str("\\&");
        }
        out.push_str(&line.replace('-', "\\-"));
    }
    RoffText(out)
}

/// Decodes common troff escapes back into plain text.
///
/// Handles `\-`, `\\`, escaped spaces, zero-width `\&` and font switches
/// (`\fB`, `\fI`, `\fR`, `\fP`). Unknown escapes keep their payload.
pub fn unescape_troff(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let Some(next) = chars.peek().copied() else {
            out.push(ch);
            break;
        };

        match next {
            // Font switches.
            'f' => {
                chars.next();
                let _ = chars.next();
            }
            ' ' => {
                chars.next();
                out.push(' ');
            }
            '\\' => {
                chars.next();
                out.push('\\');
            }
            '-' => {
                chars.next();
                out.push('-');
            }
            '&' => {
                chars.next();
            }
            other => {
                chars.next();
                out.push(other);
            }
        }
    }

    out
}
