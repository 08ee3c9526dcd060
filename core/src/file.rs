//! File handling utilities for the Hashline Templating Engine.
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
    crate::error::{
        Error,
        Result,
    },
    std::{
        fmt::{ Display, Formatter, Result as FmtResult, },
        fs::read_to_string,
        path::Path,
    },
};

const NEWLINE: char = '\n';
const CARRIAGE_RETURN: char = '\r';

/// Read a template file into memory as-is.
pub
fn read_file<P: AsRef<Path>>(p: P) -> Result<String> {
    read_to_string(&p).map_err(|e| Error::IO(e, p.as_ref().into()))
}

/// Split template content into its lines.
///
/// Splitting happens on every line feed, so `"a\n"` yields `["a", ""]` and joining the lines
/// back together with a line feed reproduces the input exactly.
pub(crate)
fn lines(content: &str) -> impl Iterator<Item = &str> {
    content.split(NEWLINE)
}

/// Remove a Windows line ending remnant from a single line.
pub(crate)
fn strip_carriage_return(line: &str) -> &str {
    line.strip_suffix(CARRIAGE_RETURN).unwrap_or(line)
}

/// A read-position within a template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub
struct Coordinate {
    line: usize,
    position: usize,
}

impl Coordinate {
    pub(crate)
    fn new(line: usize, position: usize) -> Self {
        Self { line, position, }
    }

    /// The zero-based line.
    pub
    fn line(&self) -> usize {
        self.line
    }

    /// The zero-based character position within the line.
    pub
    fn position(&self) -> usize {
        self.position
    }
}

impl Display for Coordinate {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.write_fmt(format_args!(
            "line {} position {}",
            self.line + 1,
            self.position + 1
        ))
    }
}
