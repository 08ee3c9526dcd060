//! The verifier: walks a block tree without evaluating anything.
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
        block::{
            Block,
            CheckBlock,
            ChooseBlock,
            Expr,
            ForBlock,
            GuardBlock,
            IfBlock,
            Operand,
            SwitchBlock,
            Term,
            Text,
            VarDef,
            Visitor,
        },
        error::Result,
        format::placeholders,
        token::TokenKind,
    },
    serde::Serialize,
    std::collections::{
        BTreeMap,
        BTreeSet,
    },
};

/// What a template refers to, gathered without rendering it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub
struct Outline {
    /// Root names the template expects from its context.
    pub variables: BTreeSet<String>,
    pub pipes: BTreeSet<String>,
    /// Names bound with `#var`.
    pub defined: BTreeSet<String>,
    /// Names bound by `#for` items and indexes.
    pub bindings: BTreeSet<String>,
    /// How many times each directive occurs.
    pub directives: BTreeMap<String, usize>,
}

/// Collects an [`Outline`] by visiting every branch of a block tree.
#[derive(Debug, Default)]
pub(crate)
struct Verifier {
    outline: Outline,
    loop_depth: usize,
}

impl Verifier {
    pub(crate)
    fn run(mut self, blocks: &[Block]) -> Result<Outline> {
        self.blocks(blocks)?;

        let Outline { variables, defined, bindings, .. } = &mut self.outline;
        variables.retain(|v| !defined.contains(v) && !bindings.contains(v));

        Ok(self.outline)
    }

    fn blocks(&mut self, blocks: &[Block]) -> Result<()> {
        blocks.iter().try_for_each(|b| self.visit(b))
    }

    fn count(&mut self, kind: TokenKind) {
        *self.outline.directives.entry(kind.describe().to_owned()).or_insert(0) += 1;
    }

    fn operand(&mut self, operand: &Operand) {
        if let Term::Variable(path) = &operand.term {
            self.outline.variables.insert(path.root().to_owned());
        }

        for call in operand.pipes.iter() {
            self.outline.pipes.insert(call.name.to_owned());
        }
    }

    fn expression(&mut self, expr: &Expr) {
        for operand in expr.operands() {
            self.operand(operand);
        }
    }
}

impl Visitor for Verifier {
    type Output = ();

    fn visit_text(&mut self, text: &Text) -> Result<()> {
        if self.loop_depth > 0 {
            for path in placeholders(&text.content) {
                self.outline.variables.insert(path.root().to_owned());
            }
        }

        Ok(())
    }

    fn visit_if(&mut self, block: &IfBlock) -> Result<()> {
        self.count(TokenKind::If);
        self.expression(&block.condition);
        self.blocks(&block.then)?;

        if let Some(otherwise) = &block.otherwise {
            self.count(TokenKind::Else);
            self.blocks(otherwise)?;
        }

        Ok(())
    }

    fn visit_switch(&mut self, block: &SwitchBlock) -> Result<()> {
        self.count(TokenKind::Switch);
        self.operand(&block.subject);

        for case in block.cases.iter() {
            self.count(TokenKind::Case);
            self.blocks(&case.body)?;
        }

        if let Some(default) = &block.default {
            self.count(TokenKind::Default);
            self.blocks(default)?;
        }

        Ok(())
    }

    fn visit_choose(&mut self, block: &ChooseBlock) -> Result<()> {
        self.count(TokenKind::Choose);

        for when in block.whens.iter() {
            self.count(TokenKind::When);
            self.expression(&when.condition);
            self.blocks(&when.body)?;
        }

        if let Some(default) = &block.default {
            self.count(TokenKind::Default);
            self.blocks(default)?;
        }

        Ok(())
    }

    fn visit_for(&mut self, block: &ForBlock) -> Result<()> {
        self.count(TokenKind::For);
        self.operand(&block.source);

        self.outline.bindings.insert(block.item.name.to_owned());
        if let Some(index) = &block.index {
            self.outline.bindings.insert(index.name.to_owned());
        }

        self.loop_depth += 1;
        let walked = self.blocks(&block.body);
        self.loop_depth -= 1;

        walked
    }

    fn visit_guard(&mut self, block: &GuardBlock) -> Result<()> {
        self.count(TokenKind::Guard);
        self.expression(&block.condition);
        self.blocks(&block.body)
    }

    fn visit_check(&mut self, block: &CheckBlock) -> Result<()> {
        self.count(TokenKind::Check);
        self.expression(&block.condition);
        Ok(())
    }

    fn visit_var(&mut self, block: &VarDef) -> Result<()> {
        self.count(TokenKind::DefineVar);
        self.outline.defined.insert(block.name.name.to_owned());
        self.expression(&block.value);
        Ok(())
    }
}
