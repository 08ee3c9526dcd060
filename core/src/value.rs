//! Value inspection helpers shared by the evaluator, comparators and pipes.
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
    serde_json::Value as JsonValue,
    std::{
        cmp::Ordering,
        fmt::{ Display, Formatter, Result as FmtResult, },
    },
};

const FALSE: &str = "false";
const DECIMAL_POINT: char = '.';

/// Whether a value counts as blank: null, a whitespace-only string, or an empty collection.
pub
fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => false,
    }
}

/// The truth value of a condition.
pub
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::Null => false,
        JsonValue::String(s) => !s.trim().is_empty() && s.trim() != FALSE,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

/// Parse a plain decimal such as `-12` or `3.50`.
///
/// Unlike `str::parse::<f64>` this rejects `inf`, `NaN` and exponent notation.
pub
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    let digits = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);

    let (int, frac) = match digits.split_once(DECIMAL_POINT) {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());

    if !all_digits(int) || !frac.map(all_digits).unwrap_or(true) {
        return None;
    }

    s.parse::<f64>().ok()
}

/// The numeric reading of a value. Integers are kept exact.
#[derive(Clone, Copy, Debug)]
pub
enum Numeric {
    Integer(i128),
    Decimal(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Decimal(d) => d,
        }
    }

    /// Two integers compare exactly, anything involving a decimal compares as `f64`.
    pub
    fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(l), Self::Integer(r)) => Some(l.cmp(&r)),
            (l, r) => l.as_f64().partial_cmp(&r.as_f64()),
        }
    }
}

impl Display for Numeric {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Integer(i) => fmtr.write_fmt(format_args!("{i}")),
            Self::Decimal(d) => fmtr.write_fmt(format_args!("{d}")),
        }
    }
}

fn parse_numeric(s: &str) -> Option<Numeric> {
    let s = s.trim();
    let decimal = parse_decimal(s)?;

    if !s.contains(DECIMAL_POINT) {
        if let Ok(i) = s.parse::<i128>() {
            return Some(Numeric::Integer(i));
        }
    }

    Some(Numeric::Decimal(decimal))
}

/// The numeric reading of a value, for numbers and numeric strings.
pub
fn as_number(value: &JsonValue) -> Option<Numeric> {
    match value {
        JsonValue::Number(n) => n.as_i64().map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .map(Numeric::Integer)
            .or_else(|| n.as_f64().map(Numeric::Decimal)),
        JsonValue::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// The text a value renders as.
pub
fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.to_owned(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

/// The items a `#for` walks over.
///
/// Arrays iterate their items, null and the empty string yield nothing, and any other value
/// is a single item.
pub
fn iterate(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Null => Vec::new(),
        JsonValue::Array(items) => items,
        JsonValue::String(s) if s.is_empty() => Vec::new(),
        other => vec![ other ],
    }
}
