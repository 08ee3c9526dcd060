//! Named value transforms applied with `| name(args)`.
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

mod builtin;

use {
    crate::{
        block::Literal,
        error::Result,
    },
    serde_json::Value as JsonValue,
    std::{
        collections::HashMap,
        fmt::{
            Debug,
            Formatter,
            Result as FmtResult,
        },
    },
};

/// A value transform.
///
/// Any `Fn(JsonValue, &[Literal]) -> Result<JsonValue>` is a pipe.
pub
trait Pipe: Send + Sync {
    fn apply(&self, input: JsonValue, args: &[Literal]) -> Result<JsonValue>;
}

impl<F> Pipe for F
where
    F: Fn(JsonValue, &[Literal]) -> Result<JsonValue> + Send + Sync
{
    fn apply(&self, input: JsonValue, args: &[Literal]) -> Result<JsonValue> {
        self(input, args)
    }
}

/// Pipes by name. Custom pipes shadow builtin pipes of the same name.
pub
struct PipeRegistry {
    custom: HashMap<String, Box<dyn Pipe>>,
    builtin: HashMap<String, Box<dyn Pipe>>,
}

impl Debug for PipeRegistry {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        let mut custom = self.custom.keys().collect::<Vec<&String>>();
        custom.sort();
        let mut builtin = self.builtin.keys().collect::<Vec<&String>>();
        builtin.sort();

        fmtr.debug_struct("PipeRegistry")
            .field("custom", &custom)
            .field("builtin", &builtin)
            .finish()
    }
}

impl Default for PipeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeRegistry {
    /// A registry holding only the builtin pipes.
    pub
    fn new() -> Self {
        Self {
            custom: HashMap::new(),
            builtin: builtin::all(),
        }
    }

    /// A registry with no pipes at all.
    pub
    fn empty() -> Self {
        Self {
            custom: HashMap::new(),
            builtin: HashMap::new(),
        }
    }

    /// Register a custom pipe, replacing any custom pipe of the same name.
    pub
    fn register<S, P>(&mut self, name: S, pipe: P)
    where
        S: Into<String>,
        P: Pipe + 'static
    {
        self.custom.insert(name.into(), Box::new(pipe));
    }

    /// Look a pipe up, custom first.
    pub
    fn get(&self, name: &str) -> Option<&dyn Pipe> {
        self.custom.get(name)
            .or_else(|| self.builtin.get(name))
            .map(|p| p.as_ref())
    }

    pub
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the name resolves to a builtin pipe that no custom pipe shadows.
    pub
    fn is_builtin(&self, name: &str) -> bool {
        !self.custom.contains_key(name) && self.builtin.contains_key(name)
    }
}
