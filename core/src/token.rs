//! The token model of the Hashline Templating Engine.
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
        file::Coordinate,
        parser::consts::block,
    },
    logos::Logos,
    std::fmt::{
        Display,
        Formatter,
        Result as FmtResult,
    },
};

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub
enum TokenKind {
    If,
    Else,
    EndIf,
    Switch,
    Case,
    Default,
    Break,
    End,
    Choose,
    When,
    For,
    EndFor,
    Guard,
    EndGuard,
    Check,
    CheckThrow,
    DefineVar,
    Identifier,
    String,
    Number,
    Colon,
    Comma,
    Dot,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    PipeSymbol,
    And,
    Or,
    Not,
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Find,
    NotFind,
    Match,
    NotMatch,
    PlainText,
    Newline,
    Eof,
    Unknown,
}

impl TokenKind {
    /// Map a directive word (without its sigil) to its kind.
    pub(crate)
    fn directive(word: &str) -> Self {
        match word {
            block::IF => Self::If,
            block::ELSE => Self::Else,
            block::END_IF => Self::EndIf,
            block::SWITCH => Self::Switch,
            block::CASE => Self::Case,
            block::DEFAULT => Self::Default,
            block::BREAK => Self::Break,
            block::END => Self::End,
            block::CHOOSE => Self::Choose,
            block::WHEN => Self::When,
            block::FOR => Self::For,
            block::END_FOR => Self::EndFor,
            block::GUARD => Self::Guard,
            block::END_GUARD => Self::EndGuard,
            block::CHECK => Self::Check,
            block::DEFINE_VAR => Self::DefineVar,
            _ => Self::Unknown,
        }
    }

    /// Whether the kind is one of the `#` directive keywords.
    pub
    fn is_directive(&self) -> bool {
        matches!(
            self,
            Self::If | Self::Else | Self::EndIf | Self::Switch | Self::Case | Self::Default |
            Self::Break | Self::End | Self::Choose | Self::When | Self::For | Self::EndFor |
            Self::Guard | Self::EndGuard | Self::Check | Self::DefineVar
        )
    }

    /// Whether the kind is a comparison operator.
    pub
    fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Gt | Self::Lt | Self::GtEq | Self::LtEq |
            Self::Find | Self::NotFind | Self::Match | Self::NotMatch
        )
    }

    /// A human readable name used in syntax errors.
    pub
    fn describe(&self) -> &'static str {
        match self {
            Self::If => "#if",
            Self::Else => "#else",
            Self::EndIf => "#fi",
            Self::Switch => "#switch",
            Self::Case => "#case",
            Self::Default => "#default",
            Self::Break => "#break",
            Self::End => "#end",
            Self::Choose => "#choose",
            Self::When => "#when",
            Self::For => "#for",
            Self::EndFor => "#done",
            Self::Guard => "#guard",
            Self::EndGuard => "#throw",
            Self::Check => "#check",
            Self::CheckThrow => "throw",
            Self::DefineVar => "#var",
            Self::Identifier => "identifier",
            Self::String => "string",
            Self::Number => "number",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::PipeSymbol => "'|'",
            Self::And => "'&&'",
            Self::Or => "'||'",
            Self::Not => "'!'",
            Self::Eq => "'=='",
            Self::NotEq => "'!='",
            Self::Gt => "'>'",
            Self::Lt => "'<'",
            Self::GtEq => "'>='",
            Self::LtEq => "'<='",
            Self::Find => "'~'",
            Self::NotFind => "'!~'",
            Self::Match => "'@'",
            Self::NotMatch => "'!@'",
            Self::PlainText => "text",
            Self::Newline => "end of line",
            Self::Eof => "end of template",
            Self::Unknown => "unknown token",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.write_str(self.describe())
    }
}

/// A single lexed token.
///
/// For strings the literal is the unescaped content without its quotes, for plain text it is
/// the whole line, for everything else it is the source slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub
struct Token {
    kind: TokenKind,
    literal: String,
    coord: Coordinate,
}

impl Token {
    pub(crate)
    fn new<S: Into<String>>(kind: TokenKind, literal: S, coord: Coordinate) -> Self {
        Self { kind, literal: literal.into(), coord, }
    }

    pub
    fn kind(&self) -> TokenKind {
        self.kind
    }

    pub
    fn literal(&self) -> &str {
        &self.literal
    }

    pub
    fn coord(&self) -> Coordinate {
        self.coord
    }

    /// The one-based line of the token.
    pub
    fn line(&self) -> usize {
        self.coord.line() + 1
    }

    /// The one-based column of the token.
    pub
    fn column(&self) -> usize {
        self.coord.position() + 1
    }
}

/// Raw tokens of a single directive line, produced by logos.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\f]+")]
pub(crate)
enum LineToken {
    #[regex(r"#[A-Za-z][A-Za-z0-9_]*")]
    Directive,

    #[token("throw")]
    Throw,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Identifier,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#"'([^'\\]|\\.)*'"#)]
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("|")]
    Pipe,

    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Not,

    #[token("==")]
    #[token("=")]
    Eq,
    #[token("!=")]
    #[token("<>")]
    NotEq,
    #[token(">=")]
    GtEq,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token("~")]
    Find,
    #[token("!~")]
    NotFind,
    #[token("@")]
    Match,
    #[token("!@")]
    NotMatch,
}

impl LineToken {
    /// The token kind for this raw token given its source slice.
    pub(crate)
    fn kind(&self, slice: &str) -> TokenKind {
        match self {
            Self::Directive => TokenKind::directive(
                slice.trim_start_matches(block::SIGIL)
            ),
            Self::Throw => TokenKind::CheckThrow,
            Self::Identifier => TokenKind::Identifier,
            Self::Number => TokenKind::Number,
            Self::String => TokenKind::String,
            Self::Colon => TokenKind::Colon,
            Self::Comma => TokenKind::Comma,
            Self::Dot => TokenKind::Dot,
            Self::LeftBracket => TokenKind::LeftBracket,
            Self::RightBracket => TokenKind::RightBracket,
            Self::LeftParen => TokenKind::LeftParen,
            Self::RightParen => TokenKind::RightParen,
            Self::Pipe => TokenKind::PipeSymbol,
            Self::And => TokenKind::And,
            Self::Or => TokenKind::Or,
            Self::Not => TokenKind::Not,
            Self::Eq => TokenKind::Eq,
            Self::NotEq => TokenKind::NotEq,
            Self::GtEq => TokenKind::GtEq,
            Self::LtEq => TokenKind::LtEq,
            Self::Gt => TokenKind::Gt,
            Self::Lt => TokenKind::Lt,
            Self::Find => TokenKind::Find,
            Self::NotFind => TokenKind::NotFind,
            Self::Match => TokenKind::Match,
            Self::NotMatch => TokenKind::NotMatch,
        }
    }
}
