//! The block tree a template is built into, and the visitor that walks it.
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
        context::VarPath,
        error::{
            Error,
            Result,
        },
        file::Coordinate,
    },
    serde_json::{
        Number as JsonNumber,
        Value as JsonValue,
    },
};

/// A literal written in the template.
#[derive(Clone, Debug, PartialEq)]
pub
enum Literal {
    String(String),
    Number(JsonNumber),
    Bool(bool),
    Null,
    Blank,
    /// A number with no json representation, such as one that overflows `f64`.
    Malformed {
        text: String,
        coord: Coordinate,
    },
}

impl Literal {
    /// The literal as a value. A malformed number reads as its text.
    pub
    fn to_value(&self) -> JsonValue {
        match self {
            Self::String(s) => JsonValue::String(s.to_owned()),
            Self::Number(n) => JsonValue::Number(n.clone()),
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Null => JsonValue::Null,
            Self::Blank => JsonValue::String(String::new()),
            Self::Malformed { text, .. } => JsonValue::String(text.to_owned()),
        }
    }

    /// The literal as a value, failing for a malformed number.
    pub
    fn value(&self) -> Result<JsonValue> {
        match self {
            Self::Malformed { text, coord, } => Err(Error::operand(
                format!("Malformed numeric literal '{text}'"),
                *coord,
            )),
            other => Ok(other.to_value()),
        }
    }

    /// The literal as a string argument, if it is one.
    pub
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// `| name` or `| name(arg, ...)`.
#[derive(Clone, Debug, PartialEq)]
pub
struct PipeCall {
    pub name: String,
    pub args: Vec<Literal>,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
enum Term {
    Literal(Literal),
    Variable(VarPath),
}

/// A value with its pipe chain.
#[derive(Clone, Debug, PartialEq)]
pub
struct Operand {
    pub term: Term,
    pub pipes: Vec<PipeCall>,
    pub coord: Coordinate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub
enum Comparator {
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
}

#[derive(Clone, Debug, PartialEq)]
pub
enum Expr {
    Operand(Operand),
    Not(Box<Expr>),
    Compare {
        lhs: Box<Expr>,
        op: Comparator,
        rhs: Box<Expr>,
        coord: Coordinate,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Every operand in the expression, left to right.
    pub
    fn operands(&self) -> Vec<&Operand> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands<'a>(&'a self, out: &mut Vec<&'a Operand>) {
        match self {
            Self::Operand(o) => out.push(o),
            Self::Not(e) => e.collect_operands(out),
            Self::Compare { lhs, rhs, .. } |
            Self::And(lhs, rhs) |
            Self::Or(lhs, rhs) => {
                lhs.collect_operands(out);
                rhs.collect_operands(out);
            },
        }
    }
}

/// A verbatim line of template text.
#[derive(Clone, Debug, PartialEq)]
pub
struct Text {
    pub content: String,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct IfBlock {
    pub condition: Expr,
    pub then: Vec<Block>,
    pub otherwise: Option<Vec<Block>>,
    pub coord: Coordinate,
}

/// A `#case` branch.
#[derive(Clone, Debug, PartialEq)]
pub
struct CaseBranch {
    pub values: Vec<Literal>,
    pub body: Vec<Block>,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct SwitchBlock {
    pub subject: Operand,
    pub cases: Vec<CaseBranch>,
    pub default: Option<Vec<Block>>,
    pub coord: Coordinate,
}

/// A `#when` branch.
#[derive(Clone, Debug, PartialEq)]
pub
struct WhenBranch {
    pub condition: Expr,
    pub body: Vec<Block>,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct ChooseBlock {
    pub whens: Vec<WhenBranch>,
    pub default: Option<Vec<Block>>,
    pub coord: Coordinate,
}

/// A name introduced by the template.
#[derive(Clone, Debug, PartialEq)]
pub
struct Binding {
    pub name: String,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct ForBlock {
    pub item: Binding,
    pub index: Option<Binding>,
    pub source: Operand,
    pub delimiter: Option<String>,
    pub open: Option<String>,
    pub close: Option<String>,
    pub body: Vec<Block>,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct GuardBlock {
    pub condition: Expr,
    pub body: Vec<Block>,
    pub message: Option<String>,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct CheckBlock {
    pub condition: Expr,
    pub message: String,
    pub coord: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub
struct VarDef {
    pub name: Binding,
    pub value: Expr,
    pub coord: Coordinate,
}

/// One node of a built template.
#[derive(Clone, Debug, PartialEq)]
pub
enum Block {
    Text(Text),
    If(IfBlock),
    Switch(SwitchBlock),
    Choose(ChooseBlock),
    For(ForBlock),
    Guard(GuardBlock),
    Check(CheckBlock),
    VarDef(VarDef),
}

impl Block {
    pub
    fn coord(&self) -> Coordinate {
        match self {
            Self::Text(b) => b.coord,
            Self::If(b) => b.coord,
            Self::Switch(b) => b.coord,
            Self::Choose(b) => b.coord,
            Self::For(b) => b.coord,
            Self::Guard(b) => b.coord,
            Self::Check(b) => b.coord,
            Self::VarDef(b) => b.coord,
        }
    }

    pub
    fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// A walk over the block tree.
///
/// Rendering and verification are both visitors; neither knows anything about tokens.
pub
trait Visitor {
    type Output;

    fn visit_text(&mut self, text: &Text) -> Result<Self::Output>;

    fn visit_if(&mut self, block: &IfBlock) -> Result<Self::Output>;

    fn visit_switch(&mut self, block: &SwitchBlock) -> Result<Self::Output>;

    fn visit_choose(&mut self, block: &ChooseBlock) -> Result<Self::Output>;

    fn visit_for(&mut self, block: &ForBlock) -> Result<Self::Output>;

    fn visit_guard(&mut self, block: &GuardBlock) -> Result<Self::Output>;

    fn visit_check(&mut self, block: &CheckBlock) -> Result<Self::Output>;

    fn visit_var(&mut self, block: &VarDef) -> Result<Self::Output>;

    fn visit(&mut self, block: &Block) -> Result<Self::Output> {
        match block {
            Block::Text(b) => self.visit_text(b),
            Block::If(b) => self.visit_if(b),
            Block::Switch(b) => self.visit_switch(b),
            Block::Choose(b) => self.visit_choose(b),
            Block::For(b) => self.visit_for(b),
            Block::Guard(b) => self.visit_guard(b),
            Block::Check(b) => self.visit_check(b),
            Block::VarDef(b) => self.visit_var(b),
        }
    }
}
