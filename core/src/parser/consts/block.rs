//! Constant strings representing directive keywords for the Hashline Templating Engine.
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

pub(crate)
const SIGIL: char = '#';

pub(crate)
const IF: &str = "if";

pub(crate)
const ELSE: &str = "else";

pub(crate)
const END_IF: &str = "fi";

pub(crate)
const SWITCH: &str = "switch";

pub(crate)
const CASE: &str = "case";

pub(crate)
const DEFAULT: &str = "default";

pub(crate)
const BREAK: &str = "break";

pub(crate)
const END: &str = "end";

pub(crate)
const CHOOSE: &str = "choose";

pub(crate)
const WHEN: &str = "when";

pub(crate)
const FOR: &str = "for";

pub(crate)
const END_FOR: &str = "done";

pub(crate)
const GUARD: &str = "guard";

pub(crate)
const END_GUARD: &str = "throw";

pub(crate)
const CHECK: &str = "check";

pub(crate)
const DEFINE_VAR: &str = "var";
