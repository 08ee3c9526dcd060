//! The engine facade tying the lexer, block builder, interpreter and verifier together.
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
        block::Block,
        config::{
            EngineConfig,
            Interpolation,
        },
        context::{
            Context,
            JsonAccessor,
            ValueAccessor,
        },
        error::Result,
        format::{
            Interpolator,
            TextFormatter,
            Verbatim,
        },
        interpreter::{
            Collaborators,
            Interpreter,
            Rendering,
        },
        lexer::tokenize,
        parser::Parser,
        pipe::{
            Pipe,
            PipeRegistry,
        },
        token::Token,
        verifier::{
            Outline,
            Verifier,
        },
    },
    std::fmt::{
        Debug,
        Formatter,
        Result as FmtResult,
    },
};

/// A lexed and built template, reusable across any number of renders.
#[derive(Clone, Debug, PartialEq)]
pub
struct Template {
    tokens: Vec<Token>,
    blocks: Vec<Block>,
}

impl Template {
    /// Lex and build template text. Fails only with syntax errors.
    pub
    fn parse(content: &str) -> Result<Self> {
        let tokens = tokenize(content);
        let blocks = Parser::new(&tokens).parse()?;

        Ok(Self { tokens, blocks, })
    }

    pub
    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// The templating engine.
///
/// An engine holds only read-mostly collaborators; every render call gets fresh state, so a
/// shared `&Engine` can render from many threads at once.
pub
struct Engine {
    pipes: PipeRegistry,
    formatter: Box<dyn TextFormatter>,
    accessor: Box<dyn ValueAccessor>,
    config: EngineConfig,
}

impl Debug for Engine {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.debug_struct("Engine")
            .field("pipes", &self.pipes)
            .field("formatter", &self.formatter)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the default configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashline_core::{ Context, Engine, };
    ///
    /// let engine = Engine::new();
    /// let output = engine.evaluate("hello", &Context::new()).unwrap();
    /// assert_eq!("hello", output);
    /// ```
    pub
    fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub
    fn with_config(config: EngineConfig) -> Self {
        let formatter: Box<dyn TextFormatter> = match config.interpolation {
            Interpolation::Standard => Box::new(Interpolator),
            Interpolation::Verbatim => Box::new(Verbatim),
        };

        Self {
            pipes: PipeRegistry::new(),
            formatter,
            accessor: Box::new(JsonAccessor),
            config,
        }
    }

    pub
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub
    fn pipes(&self) -> &PipeRegistry {
        &self.pipes
    }

    /// Register a custom pipe. It shadows any builtin pipe of the same name.
    pub
    fn register_pipe<S, P>(&mut self, name: S, pipe: P)
    where
        S: Into<String>,
        P: Pipe + 'static
    {
        self.pipes.register(name, pipe);
    }

    /// Replace the text formatter applied inside loop bodies.
    pub
    fn set_formatter<F: TextFormatter + 'static>(&mut self, formatter: F) {
        self.formatter = Box::new(formatter);
    }

    /// Replace the accessor used to follow variable paths.
    pub
    fn set_accessor<A: ValueAccessor + 'static>(&mut self, accessor: A) {
        self.accessor = Box::new(accessor);
    }

    /// Lex and build a template once for repeated rendering.
    pub
    fn compile(&self, content: &str) -> Result<Template> {
        let template = Template::parse(content)?;
        tracing::debug!(
            tokens = template.tokens.len(),
            blocks = template.blocks.len(),
            "compiled template"
        );
        Ok(template)
    }

    /// Check a template's structure without any context.
    ///
    /// Succeeds for exactly the templates that render without a syntax error.
    pub
    fn verify(&self, content: &str) -> Result<Outline> {
        let template = Template::parse(content)?;
        let outline = Verifier::default().run(&template.blocks)?;

        tracing::debug!(
            variables = outline.variables.len(),
            pipes = outline.pipes.len(),
            "verified template"
        );

        Ok(outline)
    }

    /// Render a compiled template, returning its output and the bindings the call made.
    pub
    fn render(&self, template: &Template, context: &Context) -> Result<Rendering> {
        let with = Collaborators {
            pipes: &self.pipes,
            formatter: self.formatter.as_ref(),
            accessor: self.accessor.as_ref(),
            delimiter: &self.config.delimiter,
        };

        let rendering = Interpreter::new(with, context).run(&template.blocks)?;

        tracing::debug!(
            length = rendering.output.len(),
            defined = rendering.defined_vars.len(),
            "rendered template"
        );

        Ok(rendering)
    }

    /// Compile and render template text in one step.
    pub
    fn evaluate(&self, content: &str, context: &Context) -> Result<String> {
        let template = self.compile(content)?;
        Ok(self.render(&template, context)?.output)
    }
}
