//! The block builder for the Hashline Templating Engine.
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

pub(crate)
mod consts;

mod expression;

use {
    crate::{
        block::{
            Binding,
            Block,
            CaseBranch,
            CheckBlock,
            ChooseBlock,
            ForBlock,
            GuardBlock,
            IfBlock,
            SwitchBlock,
            Text,
            VarDef,
            WhenBranch,
        },
        error::{
            Error,
            Result,
        },
        token::{
            Token,
            TokenKind,
        },
    },
    consts::exp,
};

/// Builds the block tree from a token stream.
///
/// This is the only place the directive grammar is encoded. Anything it accepts renders
/// without a syntax error.
#[derive(Debug)]
pub
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    /// Create a parser over a lexed token stream ending in [`TokenKind::Eof`].
    pub
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0, }
    }

    fn peek(&self) -> &'t Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx]
    }

    fn peek_kind(&self) -> TokenKind {
        if self.tokens.is_empty() {
            return TokenKind::Eof;
        }

        self.peek().kind()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.peek();

        if token.kind() != TokenKind::Eof {
            self.pos += 1;
        }

        token
    }

    fn unexpected(&self, expected: &str) -> Error {
        let token = self.peek();

        let found = match token.kind() {
            TokenKind::Identifier | TokenKind::Number | TokenKind::Unknown => format!(
                "{} '{}'", token.kind(), token.literal()
            ),
            other => other.to_string(),
        };

        Error::syntax(format!("Unexpected {found}, expected {expected}"), token.coord())
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'t Token> {
        if !self.at(kind) {
            return Err(self.unexpected(expected));
        }

        Ok(self.advance())
    }

    fn end_of_line(&mut self) -> Result<()> {
        self.expect(TokenKind::Newline, "end of line").map(|_| ())
    }

    fn identifier_is(&self, word: &str) -> bool {
        self.at(TokenKind::Identifier) && self.peek().literal() == word
    }

    fn skip_blank_text(&mut self) {
        while self.at(TokenKind::PlainText) && self.peek().literal().trim().is_empty() {
            self.advance();
        }
    }

    fn unterminated(opener: &Token, closer: &str) -> Error {
        Error::syntax(
            format!("Unterminated {}, expected {closer}", opener.kind()),
            opener.coord(),
        )
    }

    /// Build blocks until one of `closers` is reached, returning the blocks and the closer.
    fn blocks_until(
        &mut self,
        opener: Option<&'t Token>,
        closers: &[TokenKind],
    ) -> Result<(Vec<Block>, &'t Token)> {
        let mut blocks = Vec::new();
        let expected = || closers.iter()
            .map(|k| k.describe())
            .collect::<Vec<&str>>()
            .join(" or ");

        loop {
            let token = self.peek();
            let kind = token.kind();

            if closers.contains(&kind) {
                return Ok((blocks, self.advance()));
            }

            let block = match kind {
                TokenKind::PlainText => {
                    self.advance();
                    Block::Text(Text {
                        content: token.literal().to_owned(),
                        coord: token.coord(),
                    })
                },
                TokenKind::If => self.if_block()?,
                TokenKind::Switch => self.switch_block()?,
                TokenKind::Choose => self.choose_block()?,
                TokenKind::For => self.for_block()?,
                TokenKind::Guard => self.guard_block()?,
                TokenKind::Check => self.check_block()?,
                TokenKind::DefineVar => self.var_block()?,
                TokenKind::Eof => return Err(match opener {
                    Some(opener) => Self::unterminated(opener, &expected()),
                    None => self.unexpected(&expected()),
                }),
                TokenKind::Unknown => return Err(Error::syntax(
                    format!("Unknown directive '{}'", token.literal()),
                    token.coord(),
                )),
                _ => return Err(match opener {
                    Some(opener) => Error::syntax(
                        format!(
                            "Unexpected {} inside {}, expected {}",
                            kind,
                            opener.kind(),
                            expected(),
                        ),
                        token.coord(),
                    ),
                    None => Error::syntax(
                        format!("Unexpected {kind} without a matching opener"),
                        token.coord(),
                    ),
                }),
            };

            blocks.push(block);
        }
    }

    fn if_block(&mut self) -> Result<Block> {
        let opener = self.advance();
        let condition = self.expression()?;
        self.end_of_line()?;

        let (then, closer) = self.blocks_until(
            Some(opener), &[ TokenKind::Else, TokenKind::EndIf, ],
        )?;
        self.end_of_line()?;

        let otherwise = if closer.kind() == TokenKind::Else {
            let (otherwise, _) = self.blocks_until(Some(opener), &[ TokenKind::EndIf, ])?;
            self.end_of_line()?;
            Some(otherwise)
        }
        else {
            None
        };

        Ok(Block::If(IfBlock {
            condition,
            then,
            otherwise,
            coord: opener.coord(),
        }))
    }

    /// The body of a `#case`, `#when` or `#default`, up to and including its `#break`.
    fn branch_body(&mut self, branch: &'t Token) -> Result<Vec<Block>> {
        self.end_of_line()?;
        let (body, _) = self.blocks_until(Some(branch), &[ TokenKind::Break, ])?;
        self.end_of_line()?;
        Ok(body)
    }

    /// The branches between a `#switch`/`#choose` line and its `#end`.
    ///
    /// `branch` parses one branch of the `kind` directive; `#default` is handled here.
    fn branches<F>(
        &mut self,
        opener: &'t Token,
        kind: TokenKind,
        mut branch: F,
    ) -> Result<Option<Vec<Block>>>
    where
        F: FnMut(&mut Self, &'t Token) -> Result<()>
    {
        let mut default: Option<Vec<Block>> = None;
        let expected = format!("{kind}, #default or #end");

        loop {
            self.skip_blank_text();

            let token = self.peek();
            match token.kind() {
                k if k == kind => {
                    self.advance();
                    branch(self, token)?;
                },
                TokenKind::Default => {
                    if default.is_some() {
                        return Err(Error::syntax(
                            format!("Duplicate #default in {}", opener.kind()),
                            token.coord(),
                        ));
                    }

                    self.advance();
                    default = Some(self.branch_body(token)?);
                },
                TokenKind::End => {
                    self.advance();
                    self.end_of_line()?;
                    return Ok(default);
                },
                TokenKind::Eof => return Err(Self::unterminated(opener, "#end")),
                _ => return Err(self.unexpected(&expected)),
            }
        }
    }

    fn switch_block(&mut self) -> Result<Block> {
        let opener = self.advance();
        let subject = self.operand()?;
        self.end_of_line()?;

        let mut cases = Vec::new();
        let default = self.branches(opener, TokenKind::Case, |p, case| {
            let values = p.literal_list()?;
            let body = p.branch_body(case)?;

            cases.push(CaseBranch { values, body, coord: case.coord(), });
            Ok(())
        })?;

        Ok(Block::Switch(SwitchBlock {
            subject,
            cases,
            default,
            coord: opener.coord(),
        }))
    }

    fn choose_block(&mut self) -> Result<Block> {
        let opener = self.advance();
        self.end_of_line()?;

        let mut whens = Vec::new();
        let default = self.branches(opener, TokenKind::When, |p, when| {
            let condition = p.expression()?;
            let body = p.branch_body(when)?;

            whens.push(WhenBranch { condition, body, coord: when.coord(), });
            Ok(())
        })?;

        Ok(Block::Choose(ChooseBlock {
            whens,
            default,
            coord: opener.coord(),
        }))
    }

    fn binding(&mut self, what: &str) -> Result<Binding> {
        let token = self.expect(TokenKind::Identifier, what)?;

        Ok(Binding {
            name: token.literal().to_owned(),
            coord: token.coord(),
        })
    }

    fn for_option(&mut self, slot: &mut Option<String>) -> Result<()> {
        let keyword = self.advance();

        if slot.is_some() {
            return Err(Error::syntax(
                format!("Duplicate '{}' in #for", keyword.literal()),
                keyword.coord(),
            ));
        }

        let value = self.expect(TokenKind::String, "string")?;
        *slot = Some(value.literal().to_owned());

        Ok(())
    }

    fn for_block(&mut self) -> Result<Block> {
        let opener = self.advance();

        let item = self.binding("loop item name")?;
        let index = if self.at(TokenKind::Comma) {
            self.advance();
            Some(self.binding("loop index name")?)
        }
        else {
            None
        };

        if !self.identifier_is(exp::OF) {
            return Err(self.unexpected("'of'"));
        }
        self.advance();

        let source = self.operand()?;

        let mut delimiter = None;
        let mut open = None;
        let mut close = None;

        loop {
            if self.identifier_is(exp::DELIMITER) {
                self.for_option(&mut delimiter)?;
            }
            else if self.identifier_is(exp::OPEN) {
                self.for_option(&mut open)?;
            }
            else if self.identifier_is(exp::CLOSE) {
                self.for_option(&mut close)?;
            }
            else {
                break;
            }
        }

        if !self.at(TokenKind::Newline) {
            return Err(self.unexpected("'delimiter', 'open', 'close' or end of line"));
        }
        self.end_of_line()?;

        let (body, _) = self.blocks_until(Some(opener), &[ TokenKind::EndFor, ])?;
        self.end_of_line()?;

        Ok(Block::For(ForBlock {
            item,
            index,
            source,
            delimiter,
            open,
            close,
            body,
            coord: opener.coord(),
        }))
    }

    fn guard_block(&mut self) -> Result<Block> {
        let opener = self.advance();
        let condition = self.expression()?;
        self.end_of_line()?;

        let (body, _) = self.blocks_until(Some(opener), &[ TokenKind::EndGuard, ])?;

        let message = if self.at(TokenKind::String) {
            Some(self.advance().literal().to_owned())
        }
        else {
            None
        };
        self.end_of_line()?;

        Ok(Block::Guard(GuardBlock {
            condition,
            body,
            message,
            coord: opener.coord(),
        }))
    }

    fn check_block(&mut self) -> Result<Block> {
        let opener = self.advance();
        let condition = self.expression()?;

        if !self.at(TokenKind::CheckThrow) {
            return Err(self.unexpected(&format!("'{}'", exp::THROW)));
        }
        self.advance();

        let message = self.expect(TokenKind::String, "message string")?
            .literal()
            .to_owned();
        self.end_of_line()?;

        Ok(Block::Check(CheckBlock {
            condition,
            message,
            coord: opener.coord(),
        }))
    }

    fn var_block(&mut self) -> Result<Block> {
        let opener = self.advance();
        let name = self.binding("variable name")?;
        self.expect(TokenKind::Eq, "'='")?;
        let value = self.expression()?;
        self.end_of_line()?;

        Ok(Block::VarDef(VarDef {
            name,
            value,
            coord: opener.coord(),
        }))
    }

    /// Build the whole token stream.
    pub
    fn parse(mut self) -> Result<Vec<Block>> {
        if self.tokens.is_empty() {
            return Ok(Vec::new());
        }

        let (blocks, _) = self.blocks_until(None, &[ TokenKind::Eof, ])?;

        tracing::trace!(blocks = blocks.len(), "built block tree");

        Ok(blocks)
    }
}
