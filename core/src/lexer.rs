//! The lexer for the Hashline Templating Engine.
// Copyright (C) 2024  Frankie Baffa
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use {
    crate::{
        file::{
            Coordinate,
            lines,
            strip_carriage_return,
        },
        parser::consts::block,
        token::{
            LineToken,
            Token,
            TokenKind,
        },
    },
    logos::Logos,
};

const ESCAPE: char = '\\';

/// Whitespace skipped inside directive lines; must agree with the skip rule of [`LineToken`].
fn is_line_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0c')
}

/// Turns template text into a flat token stream.
///
/// Plain text lines become a single [`TokenKind::PlainText`] token each. Directive lines are
/// tokenized fully and terminated with a [`TokenKind::Newline`]. The stream always ends with
/// [`TokenKind::Eof`].
#[derive(Debug)]
pub
struct Lexer<'a> {
    content: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub
    fn new(content: &'a str) -> Self {
        Self { content, tokens: Vec::new(), }
    }

    /// Whether a line holds a directive rather than plain text.
    pub
    fn is_directive_line(line: &str) -> bool {
        let mut chars = line.trim_start_matches(is_line_space).chars();

        chars.next() == Some(block::SIGIL) &&
            chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
    }

    fn column(line: &str, byte: usize) -> usize {
        line[..byte].chars().count()
    }

    fn unescape(quoted: &str) -> String {
        let inner = &quoted[1..quoted.len() - 1];
        let mut output = String::with_capacity(inner.len());
        let mut chars = inner.chars();

        while let Some(c) = chars.next() {
            if c != ESCAPE {
                output.push(c);
                continue;
            }

            match chars.next() {
                Some('n') => output.push('\n'),
                Some('t') => output.push('\t'),
                Some('r') => output.push('\r'),
                Some(quoted @ ('\'' | '"' | ESCAPE)) => output.push(quoted),
                // kept for regex patterns such as `\d`
                Some(other) => {
                    output.push(ESCAPE);
                    output.push(other);
                },
                None => output.push(ESCAPE),
            }
        }

        output
    }

    fn directive_line(&mut self, idx: usize, line: &str) {
        let line = strip_carriage_return(line);
        let mut lexer = LineToken::lexer(line);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let slice = lexer.slice();
            let coord = Coordinate::new(idx, Self::column(line, span.start));

            let token = match result {
                Ok(LineToken::String) => Token::new(
                    TokenKind::String, Self::unescape(slice), coord,
                ),
                Ok(raw) => Token::new(raw.kind(slice), slice, coord),
                Err(_) => Token::new(TokenKind::Unknown, slice, coord),
            };

            self.tokens.push(token);
        }

        self.tokens.push(Token::new(
            TokenKind::Newline,
            "",
            Coordinate::new(idx, line.chars().count()),
        ));
    }

    /// Consume the lexer and produce the token stream.
    pub
    fn tokenize(mut self) -> Vec<Token> {
        let mut last = Coordinate::default();

        for (idx, line) in lines(self.content).enumerate() {
            if Self::is_directive_line(line) {
                self.directive_line(idx, line);
            }
            else {
                self.tokens.push(Token::new(
                    TokenKind::PlainText, line, Coordinate::new(idx, 0),
                ));
            }

            last = Coordinate::new(idx, line.chars().count());
        }

        self.tokens.push(Token::new(TokenKind::Eof, "", last));

        tracing::trace!(count = self.tokens.len(), "tokenized template");

        self.tokens
    }
}

/// Tokenize template text.
pub
fn tokenize(content: &str) -> Vec<Token> {
    Lexer::new(content).tokenize()
}
