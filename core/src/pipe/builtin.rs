//! The builtin pipes.
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
    super::Pipe,
    crate::{
        block::Literal,
        error::{
            Error,
            Result,
        },
        value::{
            is_blank,
            stringify,
        },
    },
    serde_json::{
        Map as JsonMap,
        Value as JsonValue,
    },
    std::collections::HashMap,
};

const LENGTH: &str = "length";
const UPPER: &str = "upper";
const LOWER: &str = "lower";
const TRIM: &str = "trim";
const REPLACE: &str = "replace";
const ENTRIES: &str = "entries";
const KEYS: &str = "keys";
const VALUES: &str = "values";
const JOIN: &str = "join";
const DEFAULT: &str = "default";
const REVERSE: &str = "reverse";
const FIRST: &str = "first";
const LAST: &str = "last";

const ENTRY_KEY: &str = "key";
const ENTRY_VALUE: &str = "value";
const DEFAULT_JOIN: &str = ",";

fn input_error(pipe: &str, message: String) -> Error {
    Error::PipeInput { pipe: pipe.to_owned(), message, }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn string_arg<'a>(pipe: &str, args: &'a [Literal], idx: usize) -> Result<&'a str> {
    args.get(idx)
        .and_then(|a| a.as_str())
        .ok_or_else(|| input_error(pipe, format!("expects a string argument at position {}", idx + 1)))
}

fn length(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    let len = match &input {
        JsonValue::Null => 0,
        JsonValue::String(s) => s.chars().count(),
        JsonValue::Array(a) => a.len(),
        JsonValue::Object(o) => o.len(),
        other => stringify(other).chars().count(),
    };

    Ok(JsonValue::from(len))
}

fn upper(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    Ok(JsonValue::String(stringify(&input).to_uppercase()))
}

fn lower(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    Ok(JsonValue::String(stringify(&input).to_lowercase()))
}

fn trim(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    Ok(JsonValue::String(stringify(&input).trim().to_owned()))
}

fn replace(input: JsonValue, args: &[Literal]) -> Result<JsonValue> {
    let from = string_arg(REPLACE, args, 0)?;
    let to = string_arg(REPLACE, args, 1)?;

    Ok(JsonValue::String(stringify(&input).replace(from, to)))
}

fn object(pipe: &str, input: JsonValue) -> Result<JsonMap<String, JsonValue>> {
    match input {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Null => Ok(JsonMap::new()),
        other => Err(input_error(pipe, format!("expects an object, got {}", kind(&other)))),
    }
}

fn entries(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    Ok(JsonValue::Array(object(ENTRIES, input)?
        .into_iter()
        .map(|(k, v)| {
            let mut entry = JsonMap::new();
            entry.insert(ENTRY_KEY.to_owned(), JsonValue::String(k));
            entry.insert(ENTRY_VALUE.to_owned(), v);
            JsonValue::Object(entry)
        })
        .collect()
    ))
}

fn keys(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    Ok(JsonValue::Array(object(KEYS, input)?
        .into_iter()
        .map(|(k, _)| JsonValue::String(k))
        .collect()
    ))
}

fn values(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    Ok(JsonValue::Array(object(VALUES, input)?
        .into_iter()
        .map(|(_, v)| v)
        .collect()
    ))
}

fn join(input: JsonValue, args: &[Literal]) -> Result<JsonValue> {
    let sep = if args.is_empty() {
        DEFAULT_JOIN
    }
    else {
        string_arg(JOIN, args, 0)?
    };

    Ok(JsonValue::String(match &input {
        JsonValue::Array(items) => items.iter()
            .map(stringify)
            .collect::<Vec<String>>()
            .join(sep),
        other => stringify(other),
    }))
}

fn default(input: JsonValue, args: &[Literal]) -> Result<JsonValue> {
    let fallback = args.first()
        .ok_or_else(|| input_error(DEFAULT, "expects a fallback argument".to_owned()))?;

    if is_blank(&input) {
        Ok(fallback.to_value())
    }
    else {
        Ok(input)
    }
}

fn reverse(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    match input {
        JsonValue::Null => Ok(JsonValue::Null),
        JsonValue::String(s) => Ok(JsonValue::String(s.chars().rev().collect())),
        JsonValue::Array(mut items) => {
            items.reverse();
            Ok(JsonValue::Array(items))
        },
        other => Err(input_error(REVERSE, format!("cannot reverse {}", kind(&other)))),
    }
}

fn first(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    match input {
        JsonValue::Array(items) => Ok(items.into_iter().next().unwrap_or(JsonValue::Null)),
        JsonValue::String(s) => Ok(s.chars().next()
            .map(|c| JsonValue::String(c.to_string()))
            .unwrap_or(JsonValue::Null)),
        JsonValue::Null => Ok(JsonValue::Null),
        other => Err(input_error(FIRST, format!("cannot take the first of {}", kind(&other)))),
    }
}

fn last(input: JsonValue, _: &[Literal]) -> Result<JsonValue> {
    match input {
        JsonValue::Array(items) => Ok(items.into_iter().last().unwrap_or(JsonValue::Null)),
        JsonValue::String(s) => Ok(s.chars().last()
            .map(|c| JsonValue::String(c.to_string()))
            .unwrap_or(JsonValue::Null)),
        JsonValue::Null => Ok(JsonValue::Null),
        other => Err(input_error(LAST, format!("cannot take the last of {}", kind(&other)))),
    }
}

pub(super)
fn all() -> HashMap<String, Box<dyn Pipe>> {
    let pipes: [(&str, Box<dyn Pipe>); 13] = [
        (LENGTH, Box::new(length)),
        (UPPER, Box::new(upper)),
        (LOWER, Box::new(lower)),
        (TRIM, Box::new(trim)),
        (REPLACE, Box::new(replace)),
        (ENTRIES, Box::new(entries)),
        (KEYS, Box::new(keys)),
        (VALUES, Box::new(values)),
        (JOIN, Box::new(join)),
        (DEFAULT, Box::new(default)),
        (REVERSE, Box::new(reverse)),
        (FIRST, Box::new(first)),
        (LAST, Box::new(last)),
    ];

    pipes.into_iter()
        .map(|(name, pipe)| (name.to_owned(), pipe))
        .collect()
}
