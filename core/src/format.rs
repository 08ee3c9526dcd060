//! Formatting of text lines rendered inside `#for` bodies.
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
        context::{
            Bindings,
            VarPath,
        },
        error::Result,
        value::stringify,
    },
    std::fmt::Debug,
};

const PLACEHOLDER_OPEN: &str = "${";
const PLACEHOLDER_CLOSE: char = '}';

/// The per-iteration hook applied to plain text inside loop bodies.
pub
trait TextFormatter: Debug + Send + Sync {
    fn format(&self, text: &str, bindings: &dyn Bindings) -> Result<String>;
}

/// Leaves text untouched.
#[derive(Clone, Copy, Debug, Default)]
pub
struct Verbatim;

impl TextFormatter for Verbatim {
    fn format(&self, text: &str, _: &dyn Bindings) -> Result<String> {
        Ok(text.to_owned())
    }
}

/// Replaces `${path}` placeholders with the value the path resolves to.
///
/// Placeholders that do not parse as a path, or whose path does not resolve, are kept as
/// written.
#[derive(Clone, Copy, Debug, Default)]
pub
struct Interpolator;

impl TextFormatter for Interpolator {
    fn format(&self, text: &str, bindings: &dyn Bindings) -> Result<String> {
        let mut output = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
            output.push_str(&rest[..start]);
            let after = &rest[start + PLACEHOLDER_OPEN.len()..];

            let end = match after.find(PLACEHOLDER_CLOSE) {
                Some(end) => end,
                None => {
                    rest = &rest[start..];
                    break;
                },
            };

            let whole = &rest[start..start + PLACEHOLDER_OPEN.len() + end + 1];
            let value = VarPath::parse(&after[..end]).and_then(|p| bindings.lookup(&p));

            match value {
                Some(value) => output.push_str(&stringify(&value)),
                None => output.push_str(whole),
            }

            rest = &after[end + 1..];
        }

        output.push_str(rest);

        Ok(output)
    }
}

/// The paths named by the `${...}` placeholders of a line.
pub
fn placeholders(text: &str) -> Vec<VarPath> {
    let mut paths = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        let after = &rest[start + PLACEHOLDER_OPEN.len()..];

        let end = match after.find(PLACEHOLDER_CLOSE) {
            Some(end) => end,
            None => break,
        };

        if let Some(path) = VarPath::parse(&after[..end]) {
            paths.push(path);
        }

        rest = &after[end + 1..];
    }

    paths
}
