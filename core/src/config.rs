//! Engine configuration.
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
        file::read_file,
        parser::consts::DEFAULT_DELIMITER,
    },
    serde::Deserialize,
    serde_json::from_str as from_json_str,
    std::path::Path,
};

/// Which text formatter loop bodies use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub
enum Interpolation {
    /// `${path}` placeholders are substituted.
    #[default]
    Standard,
    /// Loop body text is left as written.
    Verbatim,
}

/// Settings an engine is built from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub
struct EngineConfig {
    /// Joins `#for` iterations when the loop does not name a delimiter.
    pub delimiter: String,
    pub interpolation: Interpolation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_owned(),
            interpolation: Interpolation::default(),
        }
    }
}

impl EngineConfig {
    /// Read a configuration from a json file. Missing keys take their defaults.
    pub
    fn read<P: AsRef<Path>>(p: P) -> Result<Self> {
        let file = read_file(&p)?;

        from_json_str::<Self>(&file).map_err(|e| Error::JsonParse(e, p.as_ref().into()))
    }
}
