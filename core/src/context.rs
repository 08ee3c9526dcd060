//! The context logic of the Hashline Templating Engine
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
        error::{
            Error,
            Result,
        },
        file::{
            Coordinate,
            read_file,
        },
    },
    std::{
        fmt::{
            Display,
            Formatter,
            Result as FmtResult,
        },
        path::Path,
    },
    serde_json::{
        from_str as from_json_str,
        Value as JsonValue,
        Map as JsonMap,
    },
};

const SCOPESEP: char = '.';
const INDEX_OPEN: char = '[';
const INDEX_CLOSE: char = ']';

/// The caller supplied values a template is rendered against.
pub type Context = JsonMap<String, JsonValue>;

/// Read a json object from a file to be used as a context.
pub
fn read_context<P: AsRef<Path>>(p: P) -> Result<Context> {
    let file = read_file(&p)?;

    let value = from_json_str::<JsonValue>(&file)
        .map_err(|e| Error::JsonParse(e, p.as_ref().into()))?;

    match value {
        JsonValue::Object(map) => Ok(map),
        _ => Err(Error::NotAMap(p.as_ref().into())),
    }
}

/// A single step of a variable path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub
enum Segment {
    Key(String),
    Index(usize),
}

impl Display for Segment {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Key(k) => fmtr.write_str(k),
            Self::Index(i) => fmtr.write_fmt(format_args!("{INDEX_OPEN}{i}{INDEX_CLOSE}")),
        }
    }
}

/// A path to a value, e.g. `user.address[0]`.
///
/// The first segment is always a key naming a root binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub
struct VarPath {
    root: String,
    rest: Vec<Segment>,
}

impl VarPath {
    pub
    fn new<S: Into<String>>(root: S) -> Self {
        Self { root: root.into(), rest: Vec::new(), }
    }

    pub
    fn push(&mut self, segment: Segment) {
        self.rest.push(segment);
    }

    pub
    fn root(&self) -> &str {
        &self.root
    }

    pub
    fn rest(&self) -> &[Segment] {
        &self.rest
    }

    fn is_name(s: &str) -> bool {
        let mut chars = s.chars();

        chars.next().map(|c| c.is_ascii_alphabetic() || c == '_' || c == '$').unwrap_or(false) &&
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    }

    fn unquote(s: &str) -> Option<&str> {
        let s = s.trim();
        ['\'', '"'].iter()
            .find_map(|q| s.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
    }

    /// Parse the textual form of a path as used inside interpolation placeholders.
    pub
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let root_end = input.find(|c: char| c == SCOPESEP || c == INDEX_OPEN).unwrap_or(input.len());
        let root = &input[..root_end];

        if !Self::is_name(root) {
            return None;
        }

        let mut path = Self::new(root);
        let mut remaining = &input[root_end..];

        while !remaining.is_empty() {
            if let Some(after) = remaining.strip_prefix(SCOPESEP) {
                let end = after.find(|c: char| c == SCOPESEP || c == INDEX_OPEN).unwrap_or(after.len());
                let seg = &after[..end];

                if let Ok(idx) = seg.parse::<usize>() {
                    path.push(Segment::Index(idx));
                }
                else if Self::is_name(seg) {
                    path.push(Segment::Key(seg.to_owned()));
                }
                else {
                    return None;
                }

                remaining = &after[end..];
            }
            else if let Some(after) = remaining.strip_prefix(INDEX_OPEN) {
                let end = after.find(INDEX_CLOSE)?;
                let seg = &after[..end];

                if let Some(key) = Self::unquote(seg) {
                    path.push(Segment::Key(key.to_owned()));
                }
                else {
                    path.push(Segment::Index(seg.trim().parse().ok()?));
                }

                remaining = &after[end + 1..];
            }
            else {
                return None;
            }
        }

        Some(path)
    }
}

impl Display for VarPath {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.write_str(&self.root)?;

        for seg in self.rest.iter() {
            match seg {
                Segment::Key(k) => fmtr.write_fmt(format_args!("{SCOPESEP}{k}"))?,
                Segment::Index(_) => fmtr.write_fmt(format_args!("{seg}"))?,
            }
        }

        Ok(())
    }
}

/// Navigates nested values one path segment at a time.
pub
trait ValueAccessor: Send + Sync {
    /// The value reached by taking `segment` from `parent`, if any.
    fn child<'v>(&self, parent: &'v JsonValue, segment: &Segment) -> Option<&'v JsonValue>;

    /// Follow every segment starting at `root`.
    fn resolve(&self, root: &JsonValue, path: &[Segment]) -> Option<JsonValue> {
        let mut value = root;

        for seg in path.iter() {
            value = self.child(value, seg)?;
        }

        Some(value.clone())
    }
}

/// The default accessor over json objects and arrays.
///
/// Arrays accept numeric keys as indexes and objects accept indexes as keys.
#[derive(Clone, Copy, Debug, Default)]
pub
struct JsonAccessor;

impl ValueAccessor for JsonAccessor {
    fn child<'v>(&self, parent: &'v JsonValue, segment: &Segment) -> Option<&'v JsonValue> {
        match (parent, segment) {
            (JsonValue::Object(map), Segment::Key(k)) => map.get(k),
            (JsonValue::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
            (JsonValue::Array(arr), Segment::Index(i)) => arr.get(*i),
            (JsonValue::Array(arr), Segment::Key(k)) => k.parse::<usize>().ok()
                .and_then(|i| arr.get(i)),
            _ => None,
        }
    }
}

/// The bindings of one iteration of a `#for`.
#[derive(Debug)]
pub(crate)
struct Frame {
    occurrence: usize,
    iteration: usize,
    bindings: JsonMap<String, JsonValue>,
    vars: JsonMap<String, JsonValue>,
}

impl Frame {
    pub(crate)
    fn new(occurrence: usize, iteration: usize) -> Self {
        Self {
            occurrence,
            iteration,
            bindings: JsonMap::new(),
            vars: JsonMap::new(),
        }
    }

    pub(crate)
    fn bind<S: Into<String>>(&mut self, name: S, value: JsonValue) {
        self.bindings.insert(name.into(), value);
    }

    fn get(&self, name: &str) -> Option<&JsonValue> {
        self.vars.get(name).or_else(|| self.bindings.get(name))
    }
}

/// Where a `#var` binding ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate)
enum BoundIn {
    Global,
    Loop { occurrence: usize, iteration: usize, },
}

/// The name lookup state of a single render call.
///
/// Lookups go from the innermost loop frame outward, then to the template's own `#var`
/// definitions, then to the caller's context.
#[derive(Debug)]
pub
struct Scope<'c> {
    context: &'c Context,
    defined: JsonMap<String, JsonValue>,
    frames: Vec<Frame>,
}

impl<'c> Scope<'c> {
    pub(crate)
    fn new(context: &'c Context) -> Self {
        Self {
            context,
            defined: JsonMap::new(),
            frames: Vec::new(),
        }
    }

    /// The value bound to a root name.
    pub
    fn get(&self, name: &str) -> Option<&JsonValue> {
        self.frames.iter()
            .rev()
            .find_map(|f| f.get(name))
            .or_else(|| self.defined.get(name))
            .or_else(|| self.context.get(name))
    }

    /// Whether a root name is bound anywhere.
    pub
    fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether rendering is currently inside a `#for` body.
    pub
    fn in_loop(&self) -> bool {
        !self.frames.is_empty()
    }

    pub(crate)
    fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate)
    fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Bind a `#var`. Inside a loop the binding lives in the current iteration.
    pub(crate)
    fn define(&mut self, name: &str, value: JsonValue, coord: Coordinate) -> Result<BoundIn> {
        if self.is_bound(name) {
            return Err(Error::duplicate(name, coord));
        }

        if let Some(frame) = self.frames.last_mut() {
            frame.vars.insert(name.to_owned(), value);

            return Ok(BoundIn::Loop {
                occurrence: frame.occurrence,
                iteration: frame.iteration,
            });
        }

        self.defined.insert(name.to_owned(), value);

        Ok(BoundIn::Global)
    }

    pub(crate)
    fn into_defined(self) -> JsonMap<String, JsonValue> {
        self.defined
    }
}

/// Read access to named values, handed to text formatters.
pub
trait Bindings {
    /// Resolve a path, `None` when the root or any segment is missing.
    fn lookup(&self, path: &VarPath) -> Option<JsonValue>;
}

/// Resolves paths against a [`Scope`] using a [`ValueAccessor`].
pub
struct Resolver<'a, 'c> {
    scope: &'a Scope<'c>,
    accessor: &'a dyn ValueAccessor,
}

impl<'a, 'c> Resolver<'a, 'c> {
    pub
    fn new(scope: &'a Scope<'c>, accessor: &'a dyn ValueAccessor) -> Self {
        Self { scope, accessor, }
    }
}

impl Bindings for Resolver<'_, '_> {
    fn lookup(&self, path: &VarPath) -> Option<JsonValue> {
        let root = self.scope.get(path.root())?;
        self.accessor.resolve(root, path.rest())
    }
}
