// Copyright 2019-2021 Parity Technologies (UK) Ltd.
// This file is part of celldec.
//
// celldec is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
// celldec is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with celldec.  If not, see <http://www.gnu.org/licenses/>.

use celldec_common::SliceError;
use thiserror::Error;

/// Errors raised while compiling schema text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	#[error("Syntax error at line {line}, column {column}: {message}")]
	Syntax { line: usize, column: usize, message: String },
	#[error("Unsupported schema feature at line {line}: {feature}")]
	Unsupported { line: usize, feature: String },
	#[error("Unknown type `{0}`")]
	UnknownType(String),
	#[error("Invalid width {width} for `{ty}`")]
	InvalidWidth { ty: String, width: usize },
	#[error("Schema declares no types")]
	Empty,
}

/// Errors raised while deserializing a cell against a compiled schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlbError {
	#[error(transparent)]
	Slice(#[from] SliceError),
	#[error("Tag mismatch for constructor `{0}`")]
	TagMismatch(String),
	#[error("No constructor of `{0}` matches")]
	NoConstructor(String),
	#[error("Unknown type `{0}`")]
	UnknownType(String),
	#[error("{bits} bits and {refs} references left unread")]
	Trailing { bits: usize, refs: usize },
	#[error("Text is not valid UTF-8")]
	InvalidUtf8,
	#[error("Integer of {0} bits is too wide")]
	TooWide(usize),
	#[error("Types nest deeper than {0} levels")]
	TooDeep(usize),
	#[error("Exotic cell of type {0} has no schema")]
	Exotic(u8),
	#[error("No type in the schema matches the cell")]
	NoMatch,
}
