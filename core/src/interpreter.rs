//! The interpreter: renders a block tree against a context.
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
            Binding,
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
        compare::{
            compare,
            equals,
            Patterns,
        },
        context::{
            BoundIn,
            Context,
            Frame,
            Resolver,
            Scope,
            ValueAccessor,
            VarPath,
        },
        error::{
            Error,
            Result,
        },
        format::TextFormatter,
        parser::consts,
        pipe::PipeRegistry,
        value::{
            is_truthy,
            iterate,
        },
    },
    serde::Serialize,
    serde_json::{
        Map as JsonMap,
        Value as JsonValue,
    },
    std::collections::BTreeMap,
};

const FRAGMENT_SEPARATOR: &str = "\n";

/// Identifies one `#var` binding made inside a loop iteration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub
struct ForVarKey {
    pub name: String,
    /// Which `#for` execution of the render call, counting from zero.
    pub occurrence: usize,
    pub iteration: usize,
}

/// The output of one render call along with the bindings it made.
#[derive(Clone, Debug, Default, PartialEq)]
pub
struct Rendering {
    pub output: String,
    pub defined_vars: JsonMap<String, JsonValue>,
    pub for_generated_vars: BTreeMap<ForVarKey, JsonValue>,
}

/// The collaborators an interpreter borrows from its engine.
#[derive(Clone, Copy)]
pub(crate)
struct Collaborators<'e> {
    pub(crate) pipes: &'e PipeRegistry,
    pub(crate) formatter: &'e dyn TextFormatter,
    pub(crate) accessor: &'e dyn ValueAccessor,
    pub(crate) delimiter: &'e str,
}

/// Renders blocks. One interpreter lives for exactly one render call.
pub(crate)
struct Interpreter<'e, 'c> {
    with: Collaborators<'e>,
    scope: Scope<'c>,
    for_vars: BTreeMap<ForVarKey, JsonValue>,
    occurrences: usize,
    patterns: Patterns,
}

impl<'e, 'c> Interpreter<'e, 'c> {
    pub(crate)
    fn new(with: Collaborators<'e>, context: &'c Context) -> Self {
        Self {
            with,
            scope: Scope::new(context),
            for_vars: BTreeMap::new(),
            occurrences: 0,
            patterns: Patterns::default(),
        }
    }

    /// Render a top-level block list and hand back everything the call produced.
    pub(crate)
    fn run(mut self, blocks: &[Block]) -> Result<Rendering> {
        let output = self.render(blocks)?;

        Ok(Rendering {
            output,
            defined_vars: self.scope.into_defined(),
            for_generated_vars: self.for_vars,
        })
    }

    /// Render a block list into one string.
    ///
    /// Text lines are always kept. Directives that render to nothing are dropped so they do
    /// not leave blank lines behind.
    fn render(&mut self, blocks: &[Block]) -> Result<String> {
        let mut fragments = Vec::with_capacity(blocks.len());

        for block in blocks.iter() {
            let fragment = self.visit(block)?;

            if block.is_text() || !is_blank_text(&fragment) {
                fragments.push(fragment);
            }
        }

        Ok(fragments.join(FRAGMENT_SEPARATOR))
    }

    fn lookup(&self, path: &VarPath) -> JsonValue {
        self.scope.get(path.root())
            .and_then(|root| self.with.accessor.resolve(root, path.rest()))
            .unwrap_or(JsonValue::Null)
    }

    fn operand(&mut self, operand: &Operand) -> Result<JsonValue> {
        let mut value = match &operand.term {
            Term::Literal(l) => l.value()?,
            Term::Variable(path) => self.lookup(path),
        };

        for call in operand.pipes.iter() {
            let pipe = self.with.pipes.get(&call.name).ok_or_else(|| Error::PipeNotFound {
                name: call.name.to_owned(),
                coord: call.coord,
            })?;

            for arg in call.args.iter() {
                arg.value()?;
            }

            value = pipe.apply(value, &call.args)?;
        }

        Ok(value)
    }

    fn expression(&mut self, expr: &Expr) -> Result<JsonValue> {
        Ok(match expr {
            Expr::Operand(o) => self.operand(o)?,
            Expr::Not(e) => JsonValue::Bool(!self.condition(e)?),
            Expr::And(lhs, rhs) => JsonValue::Bool(
                self.condition(lhs)? && self.condition(rhs)?
            ),
            Expr::Or(lhs, rhs) => JsonValue::Bool(
                self.condition(lhs)? || self.condition(rhs)?
            ),
            Expr::Compare { lhs, op, rhs, coord } => {
                let l = self.expression(lhs)?;
                let r = self.expression(rhs)?;
                JsonValue::Bool(compare(*op, &l, &r, *coord, &mut self.patterns)?)
            },
        })
    }

    fn condition(&mut self, expr: &Expr) -> Result<bool> {
        Ok(is_truthy(&self.expression(expr)?))
    }

    fn bind_loop_name(&self, binding: &Binding) -> Result<()> {
        if self.scope.is_bound(&binding.name) {
            return Err(Error::duplicate(&binding.name, binding.coord));
        }

        Ok(())
    }
}

fn is_blank_text(s: &str) -> bool {
    s.trim().is_empty()
}

impl Visitor for Interpreter<'_, '_> {
    type Output = String;

    fn visit_text(&mut self, text: &Text) -> Result<String> {
        if !self.scope.in_loop() {
            return Ok(text.content.to_owned());
        }

        let resolver = Resolver::new(&self.scope, self.with.accessor);
        self.with.formatter.format(&text.content, &resolver)
    }

    fn visit_if(&mut self, block: &IfBlock) -> Result<String> {
        let is_true = self.condition(&block.condition)?;
        tracing::trace!(coord = %block.coord, is_true, "#if");

        if is_true {
            self.render(&block.then)
        }
        else if let Some(otherwise) = &block.otherwise {
            self.render(otherwise)
        }
        else {
            Ok(String::new())
        }
    }

    fn visit_switch(&mut self, block: &SwitchBlock) -> Result<String> {
        let subject = self.operand(&block.subject)?;

        let mut selected = None;
        'cases: for case in block.cases.iter() {
            for value in case.values.iter() {
                if equals(&subject, &value.value()?) {
                    selected = Some(&case.body);
                    break 'cases;
                }
            }
        }
        let selected = selected.or(block.default.as_ref());

        tracing::trace!(coord = %block.coord, matched = selected.is_some(), "#switch");

        match selected {
            Some(body) => self.render(body),
            None => Ok(String::new()),
        }
    }

    fn visit_choose(&mut self, block: &ChooseBlock) -> Result<String> {
        for when in block.whens.iter() {
            if self.condition(&when.condition)? {
                tracing::trace!(coord = %when.coord, "#when selected");
                return self.render(&when.body);
            }
        }

        match &block.default {
            Some(body) => self.render(body),
            None => Ok(String::new()),
        }
    }

    fn visit_for(&mut self, block: &ForBlock) -> Result<String> {
        let occurrence = self.occurrences;
        self.occurrences += 1;

        if let Some(index) = &block.index {
            if index.name == block.item.name {
                return Err(Error::duplicate(&index.name, index.coord));
            }

            self.bind_loop_name(index)?;
        }
        self.bind_loop_name(&block.item)?;

        let items = iterate(self.operand(&block.source)?);
        tracing::trace!(coord = %block.coord, occurrence, items = items.len(), "#for");

        let mut parts = Vec::with_capacity(items.len());
        for (iteration, item) in items.into_iter().enumerate() {
            let mut frame = Frame::new(occurrence, iteration);
            frame.bind(block.item.name.to_owned(), item);

            if let Some(index) = &block.index {
                frame.bind(index.name.to_owned(), JsonValue::from(iteration));
            }

            self.scope.push_frame(frame);
            let rendered = self.render(&block.body);
            self.scope.pop_frame();

            let rendered = rendered?;
            if !is_blank_text(&rendered) {
                parts.push(rendered);
            }
        }

        if parts.is_empty() {
            return Ok(String::new());
        }

        let delimiter = block.delimiter.as_deref().unwrap_or(self.with.delimiter);

        Ok(format!(
            "{}{}{}",
            block.open.as_deref().unwrap_or_default(),
            parts.join(delimiter),
            block.close.as_deref().unwrap_or_default(),
        ))
    }

    fn visit_guard(&mut self, block: &GuardBlock) -> Result<String> {
        if !self.condition(&block.condition)? {
            return Err(Error::GuardViolation {
                message: block.message.as_deref()
                    .unwrap_or(consts::DEFAULT_GUARD_MESSAGE)
                    .to_owned(),
                coord: block.coord,
            });
        }

        self.render(&block.body)
    }

    fn visit_check(&mut self, block: &CheckBlock) -> Result<String> {
        if self.condition(&block.condition)? {
            return Err(Error::CheckViolation {
                message: block.message.to_owned(),
                coord: block.coord,
            });
        }

        Ok(String::new())
    }

    fn visit_var(&mut self, block: &VarDef) -> Result<String> {
        let name = &block.name.name;

        if self.scope.is_bound(name) {
            return Err(Error::duplicate(name, block.name.coord));
        }

        let value = self.expression(&block.value)?;

        if let BoundIn::Loop { occurrence, iteration, } = self.scope.define(
            name, value.clone(), block.name.coord,
        )? {
            self.for_vars.insert(ForVarKey {
                name: name.to_owned(),
                occurrence,
                iteration,
            }, value);
        }

        Ok(String::new())
    }
}
