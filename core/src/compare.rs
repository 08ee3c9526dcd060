//! Comparison operators.
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
        block::Comparator,
        error::{
            Error,
            Result,
        },
        file::Coordinate,
        value::{
            as_number,
            is_blank,
            stringify,
        },
    },
    regex::Regex,
    serde_json::Value as JsonValue,
    std::{
        cmp::Ordering,
        collections::{
            hash_map::Entry,
            HashMap,
        },
    },
};

/// Loose equality.
///
/// Two blanks are equal, two bools compare as bools, two numerics compare by value, anything
/// else compares by its rendered text.
pub
fn equals(lhs: &JsonValue, rhs: &JsonValue) -> bool {
    match (is_blank(lhs), is_blank(rhs)) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => (),
    }

    if let (JsonValue::Bool(l), JsonValue::Bool(r)) = (lhs, rhs) {
        return l == r;
    }

    if let (Some(l), Some(r)) = (as_number(lhs), as_number(rhs)) {
        return l.compare(r) == Some(Ordering::Equal);
    }

    stringify(lhs) == stringify(rhs)
}

/// Numeric ordering; both sides must be numeric.
pub
fn ordering(lhs: &JsonValue, rhs: &JsonValue, coord: Coordinate) -> Result<Ordering> {
    let numeric = |v: &JsonValue| as_number(v).ok_or_else(|| Error::operand(
        format!("Cannot order non-numeric value '{}'", stringify(v)),
        coord,
    ));

    let l = numeric(lhs)?;
    let r = numeric(rhs)?;

    l.compare(r).ok_or_else(|| Error::operand(
        format!("Cannot order {l} and {r}"),
        coord,
    ))
}

/// Compiled regular expressions, keyed by their final pattern.
#[derive(Debug, Default)]
pub(crate)
struct Patterns {
    cache: HashMap<String, Regex>,
}

impl Patterns {
    fn compiled(&mut self, pattern: String, coord: Coordinate) -> Result<&Regex> {
        match self.cache.entry(pattern) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let regex = Regex::new(entry.key()).map_err(|source| Error::InvalidPattern {
                    pattern: entry.key().to_owned(),
                    coord,
                    source,
                })?;

                Ok(entry.insert(regex))
            },
        }
    }

    /// Whether the pattern matches anywhere in the text.
    pub(crate)
    fn find(&mut self, text: &str, pattern: &str, coord: Coordinate) -> Result<bool> {
        Ok(self.compiled(pattern.to_owned(), coord)?.is_match(text))
    }

    /// Whether the pattern matches the entire text.
    pub(crate)
    fn full_match(&mut self, text: &str, pattern: &str, coord: Coordinate) -> Result<bool> {
        Ok(self.compiled(format!("^(?:{pattern})$"), coord)?.is_match(text))
    }
}

/// Apply a comparison operator.
pub(crate)
fn compare(
    op: Comparator,
    lhs: &JsonValue,
    rhs: &JsonValue,
    coord: Coordinate,
    patterns: &mut Patterns,
) -> Result<bool> {
    Ok(match op {
        Comparator::Eq => equals(lhs, rhs),
        Comparator::NotEq => !equals(lhs, rhs),
        Comparator::Gt => ordering(lhs, rhs, coord)? == Ordering::Greater,
        Comparator::Lt => ordering(lhs, rhs, coord)? == Ordering::Less,
        Comparator::GtEq => ordering(lhs, rhs, coord)? != Ordering::Less,
        Comparator::LtEq => ordering(lhs, rhs, coord)? != Ordering::Greater,
        Comparator::Find => patterns.find(&stringify(lhs), &stringify(rhs), coord)?,
        Comparator::NotFind => !patterns.find(&stringify(lhs), &stringify(rhs), coord)?,
        Comparator::Match => patterns.full_match(&stringify(lhs), &stringify(rhs), coord)?,
        Comparator::NotMatch => !patterns.full_match(&stringify(lhs), &stringify(rhs), coord)?,
    })
}
