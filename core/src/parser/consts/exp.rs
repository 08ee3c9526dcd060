//! Constant strings representing expressions for the Hashline Templating Engine.
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
const NULL: &str = "null";

pub(crate)
const BLANK: &str = "blank";

pub(crate)
const TRUE: &str = "true";

pub(crate)
const FALSE: &str = "false";

pub(crate)
const THROW: &str = "throw";

pub(crate)
const OF: &str = "of";

pub(crate)
const DELIMITER: &str = "delimiter";

pub(crate)
const OPEN: &str = "open";

pub(crate)
const CLOSE: &str = "close";
