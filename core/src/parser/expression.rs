//! Expression parsing for the block builder.
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
    super::{
        consts::exp,
        Parser,
    },
    crate::{
        block::{
            Comparator,
            Expr,
            Literal,
            Operand,
            PipeCall,
            Term,
        },
        context::{
            Segment,
            VarPath,
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
    serde_json::Number as JsonNumber,
};

const DECIMAL_POINT: char = '.';

fn comparator(kind: TokenKind) -> Option<Comparator> {
    Some(match kind {
        TokenKind::Eq => Comparator::Eq,
        TokenKind::NotEq => Comparator::NotEq,
        TokenKind::Gt => Comparator::Gt,
        TokenKind::Lt => Comparator::Lt,
        TokenKind::GtEq => Comparator::GtEq,
        TokenKind::LtEq => Comparator::LtEq,
        TokenKind::Find => Comparator::Find,
        TokenKind::NotFind => Comparator::NotFind,
        TokenKind::Match => Comparator::Match,
        TokenKind::NotMatch => Comparator::NotMatch,
        _ => return None,
    })
}

fn number(token: &Token) -> Literal {
    let literal = token.literal();

    if let Ok(i) = literal.parse::<i64>() {
        return Literal::Number(JsonNumber::from(i));
    }

    literal.parse::<f64>()
        .ok()
        .and_then(JsonNumber::from_f64)
        .map(Literal::Number)
        .unwrap_or_else(|| Literal::Malformed {
            text: literal.to_owned(),
            coord: token.coord(),
        })
}

fn index(token: &Token, literal: &str) -> Result<usize> {
    literal.parse::<usize>().map_err(|_| Error::syntax(
        format!("Invalid index '{literal}'"),
        token.coord(),
    ))
}

impl<'t> Parser<'t> {
    /// `or := and ('||' and)*`
    pub(super)
    fn expression(&mut self) -> Result<Expr> {
        let mut lhs = self.and()?;

        while self.at(TokenKind::Or) {
            self.advance();
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut lhs = self.comparison()?;

        while self.at(TokenKind::And) {
            self.advance();
            let rhs = self.comparison()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let lhs = self.unary()?;

        let op = match comparator(self.peek_kind()) {
            Some(op) => op,
            None => return Ok(lhs),
        };
        let coord = self.advance().coord();
        let rhs = self.unary()?;

        Ok(Expr::Compare {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            coord,
        })
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.at(TokenKind::Not) {
            self.advance();
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }

        if self.at(TokenKind::LeftParen) {
            self.advance();
            let inner = self.expression()?;
            self.expect(TokenKind::RightParen, "')'")?;
            return Ok(inner);
        }

        Ok(Expr::Operand(self.operand()?))
    }

    /// A single literal: a quoted string, a number, a reserved word or a bare word.
    pub(super)
    fn literal(&mut self) -> Result<Literal> {
        let token = self.peek();

        let literal = match token.kind() {
            TokenKind::String => Literal::String(token.literal().to_owned()),
            TokenKind::Number => number(token),
            TokenKind::Identifier => match token.literal() {
                exp::NULL => Literal::Null,
                exp::BLANK => Literal::Blank,
                exp::TRUE => Literal::Bool(true),
                exp::FALSE => Literal::Bool(false),
                word => Literal::String(word.to_owned()),
            },
            _ => return Err(self.unexpected("literal")),
        };

        self.advance();

        Ok(literal)
    }

    /// One or more comma separated literals.
    pub(super)
    fn literal_list(&mut self) -> Result<Vec<Literal>> {
        let mut values = vec![ self.literal()? ];

        while self.at(TokenKind::Comma) {
            self.advance();
            values.push(self.literal()?);
        }

        Ok(values)
    }

    fn var_path(&mut self) -> Result<VarPath> {
        let root = self.expect(TokenKind::Identifier, "variable name")?;
        let mut path = VarPath::new(root.literal());

        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let token = self.peek();

                    match token.kind() {
                        TokenKind::Identifier => path.push(
                            Segment::Key(token.literal().to_owned())
                        ),
                        // `a.0.1` lexes its tail as the decimal `0.1`
                        TokenKind::Number => for part in token.literal().split(DECIMAL_POINT) {
                            path.push(Segment::Index(index(token, part)?));
                        },
                        _ => return Err(self.unexpected("path segment")),
                    }

                    self.advance();
                },
                TokenKind::LeftBracket => {
                    self.advance();
                    let token = self.peek();

                    match token.kind() {
                        TokenKind::Number => path.push(
                            Segment::Index(index(token, token.literal())?)
                        ),
                        TokenKind::String => path.push(
                            Segment::Key(token.literal().to_owned())
                        ),
                        _ => return Err(self.unexpected("index or quoted key")),
                    }

                    self.advance();
                    self.expect(TokenKind::RightBracket, "']'")?;
                },
                _ => return Ok(path),
            }
        }
    }

    fn pipes(&mut self) -> Result<Vec<PipeCall>> {
        let mut pipes = Vec::new();

        while self.at(TokenKind::PipeSymbol) {
            self.advance();
            let name = self.expect(TokenKind::Identifier, "pipe name")?;

            let args = if self.at(TokenKind::LeftParen) {
                self.advance();

                if self.at(TokenKind::RightParen) {
                    self.advance();
                    Vec::new()
                }
                else {
                    let args = self.literal_list()?;
                    self.expect(TokenKind::RightParen, "',' or ')'")?;
                    args
                }
            }
            else {
                Vec::new()
            };

            pipes.push(PipeCall {
                name: name.literal().to_owned(),
                args,
                coord: name.coord(),
            });
        }

        Ok(pipes)
    }

    /// A value followed by its pipe chain.
    pub(super)
    fn operand(&mut self) -> Result<Operand> {
        let coord = self.peek().coord();

        let term = if self.at(TokenKind::Colon) {
            self.advance();
            Term::Variable(self.var_path()?)
        }
        else if matches!(
            self.peek_kind(),
            TokenKind::String | TokenKind::Number | TokenKind::Identifier
        ) {
            Term::Literal(self.literal()?)
        }
        else {
            return Err(self.unexpected("operand"));
        };

        Ok(Operand {
            term,
            pipes: self.pipes()?,
            coord,
        })
    }
}
