//! The Hashline Templating Engine.
//!
//! Renders text templates driven by `#`-prefixed directive lines (`#if`, `#switch`, `#choose`,
//! `#for`, `#guard`, `#check` and `#var`) against a json context.
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

pub mod block;
pub mod compare;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod file;
pub mod format;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod pipe;
pub mod token;
pub mod value;
pub mod verifier;

#[cfg(test)]
mod test;

pub use {
    block::{
        Block,
        Literal,
        Visitor,
    },
    config::{
        EngineConfig,
        Interpolation,
    },
    context::{
        read_context,
        Bindings,
        Context,
        JsonAccessor,
        Segment,
        ValueAccessor,
        VarPath,
    },
    engine::{
        Engine,
        Template,
    },
    error::{
        Error,
        Result,
    },
    file::{
        read_file,
        Coordinate,
    },
    format::{
        Interpolator,
        TextFormatter,
        Verbatim,
    },
    interpreter::{
        ForVarKey,
        Rendering,
    },
    pipe::{
        Pipe,
        PipeRegistry,
    },
    token::{
        Token,
        TokenKind,
    },
    verifier::Outline,
};
