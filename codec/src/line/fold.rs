// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Line folding (RFC 6350 Section 3.2, RFC 5545 Section 3.1).

/// Folding sequence: CRLF followed by a single space.
pub const FOLD: &str = "\r\n ";

/// A logical line after unfolding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based number of the first physical line
    pub number: usize,
    /// Unfolded text without line terminator
    pub text: String,
}

/// Fold a line so no physical line exceeds `width` octets.
///
/// The first physical line holds up to `width` octets, continuation lines up to
/// `width - 1` octets after the leading space. Folds only at UTF-8 character boundaries.
#[must_use]
pub fn fold(line: &str, width: usize) -> String {
    if width < 2 || line.len() <= width {
        return line.to_owned();
    }

    let mut out = String::with_capacity(line.len() + line.len() / width * FOLD.len());
    let mut current = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if current + len > width {
            out.push_str(FOLD);
            current = 1; // the leading space
        }
        out.push(c);
        current += len;
    }
    out
}

/// Unfold physical lines into logical lines.
///
/// Lines starting with a space or tab continue the previous line, with that single
/// whitespace removed. A quoted-printable value whose physical line ends in `=` continues
/// on the next line even without leading whitespace (vCard 2.1 soft line break).
/// Line terminators may be CRLF or bare LF.
#[must_use]
pub fn unfold(text: &str) -> Vec<LogicalLine> {
    let mut lines: Vec<LogicalLine> = Vec::new();
    let physical: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let count = physical.len();

    for (i, raw) in physical.into_iter().enumerate() {
        match lines.last_mut() {
            Some(last) if raw.starts_with([' ', '\t']) => {
                last.text.push_str(raw.get(1..).unwrap_or_default());
            }
            Some(last) if !raw.is_empty() && is_soft_broken(&last.text) => {
                last.text.pop();
                last.text.push_str(raw);
            }
            _ if raw.is_empty() && i + 1 == count => {} // trailing terminator
            _ => lines.push(LogicalLine {
                number: i + 1,
                text: raw.to_owned(),
            }),
        }
    }
    lines
}

fn is_soft_broken(line: &str) -> bool {
    line.ends_with('=') && is_quoted_printable(line)
}

fn is_quoted_printable(line: &str) -> bool {
    let head = line.split(':').next().unwrap_or_default();
    head.to_ascii_uppercase().contains("QUOTED-PRINTABLE")
}
