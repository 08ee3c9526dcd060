//! Error types for the Hashline Templating Engine.
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
    crate::file::Coordinate,
    regex::Error as RegexError,
    serde_json::Error as JsonError,
    std::{
        io::Error as IOError,
        path::PathBuf,
        result::Result as StdResult,
    },
    thiserror::Error as ThisError,
};

/// The error type for the Hashline Templating Engine.
#[derive(Debug, ThisError)]
pub
enum Error {
    #[error("IO error in {1:?} {0}")]
    IO(#[source] IOError, PathBuf),
    #[error("Json error in {1:?} {0}")]
    JsonParse(#[source] JsonError, PathBuf),
    #[error("Json at {0:?} was not an object")]
    NotAMap(PathBuf),
    #[error("Syntax error at {coord}: {message}")]
    Syntax {
        message: String,
        coord: Coordinate,
    },
    #[error("Guard violation: {message}")]
    GuardViolation {
        message: String,
        coord: Coordinate,
    },
    #[error("Check violation: {message}")]
    CheckViolation {
        message: String,
        coord: Coordinate,
    },
    #[error("Pipe \"{name}\" not found at {coord}")]
    PipeNotFound {
        name: String,
        coord: Coordinate,
    },
    #[error("Pipe \"{pipe}\" cannot transform its input: {message}")]
    PipeInput {
        pipe: String,
        message: String,
    },
    #[error("Operand type error at {coord}: {message}")]
    OperandType {
        message: String,
        coord: Coordinate,
    },
    #[error("Name \"{name}\" at {coord} is already bound")]
    DuplicateBinding {
        name: String,
        coord: Coordinate,
    },
    #[error("Invalid pattern \"{pattern}\" at {coord}: {source}")]
    InvalidPattern {
        pattern: String,
        coord: Coordinate,
        #[source]
        source: RegexError,
    },
}

impl Error {
    pub(crate)
    fn syntax<S: Into<String>>(message: S, coord: Coordinate) -> Self {
        Self::Syntax { message: message.into(), coord, }
    }

    pub(crate)
    fn operand<S: Into<String>>(message: S, coord: Coordinate) -> Self {
        Self::OperandType { message: message.into(), coord, }
    }

    pub(crate)
    fn duplicate<S: Into<String>>(name: S, coord: Coordinate) -> Self {
        Self::DuplicateBinding { name: name.into(), coord, }
    }

    /// Whether the error is a structural failure of the template itself, as opposed to a
    /// failure caused by the data it was rendered against.
    pub
    fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// The template position the error points at, if it has one.
    pub
    fn coord(&self) -> Option<Coordinate> {
        match self {
            Self::Syntax { coord, .. } |
            Self::GuardViolation { coord, .. } |
            Self::CheckViolation { coord, .. } |
            Self::PipeNotFound { coord, .. } |
            Self::OperandType { coord, .. } |
            Self::DuplicateBinding { coord, .. } |
            Self::InvalidPattern { coord, .. } => Some(*coord),
            Self::IO(..) | Self::JsonParse(..) | Self::NotAMap(..) |
            Self::PipeInput { .. } => None,
        }
    }
}

/// The result type for the Hashline Templating Engine.
pub type Result<T> = StdResult<T, Error>;
