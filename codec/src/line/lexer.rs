// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lexer for the head (`group.NAME;PARAM=VALUE`) of an unfolded content line.

use std::fmt::{self, Display};

use logos::Logos;

/// Token emitted by the content line lexer
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
pub enum Token<'a> {
    /// Double Quote ("), decimal codepoint 22
    #[token(r#"""#)]
    DQuote,

    /// Comma (,), decimal codepoint 44
    #[token(",")]
    Comma,

    /// Dot (.), decimal codepoint 46, separates the group from the name
    #[token(".")]
    Dot,

    /// Colon (:), decimal codepoint 58
    #[token(":")]
    Colon,

    /// Semicolon (;), decimal codepoint 59
    #[token(";")]
    Semicolon,

    /// Equal sign (=), decimal codepoint 61
    #[token("=")]
    Equal,

    /// Anything else
    #[regex(r#"[^",.:;=]+"#)]
    Text(&'a str),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DQuote => write!(f, "DQuote"),
            Self::Comma => write!(f, "Comma"),
            Self::Dot => write!(f, "Dot"),
            Self::Colon => write!(f, "Colon"),
            Self::Semicolon => write!(f, "Semicolon"),
            Self::Equal => write!(f, "Equal"),
            Self::Text(s) => write!(f, "Text({s})"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Token::*;
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        Token::lexer(src).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn tokenizes_grouped_head() {
        assert_eq!(
            tokens("item1.TEL;TYPE=CELL,VOICE:+1"),
            [
                Text("item1"),
                Dot,
                Text("TEL"),
                Semicolon,
                Text("TYPE"),
                Equal,
                Text("CELL"),
                Comma,
                Text("VOICE"),
                Colon,
                Text("+1"),
            ]
        );
    }

    #[test]
    fn tokenizes_quoted_parameter() {
        assert_eq!(
            tokens(r#"X;A="x:y""#),
            [Text("X"), Semicolon, Text("A"), Equal, DQuote, Text("x"), Colon, Text("y"), DQuote]
        );
    }

    #[test]
    fn keeps_unicode_and_spaces_in_text() {
        assert_eq!(tokens("名 前"), [Text("名 前")]);
    }
}
