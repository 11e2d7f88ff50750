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

use super::{SchemaHint, Strategy};
use crate::error::StrategyError;
use celldec_common::{Cell, Value};
use celldec_tlb::{Library, SchemaError, TEXT_COMMENT};
use std::sync::Arc;

/// Opcode of a plain text comment.
const COMMENT_OPCODE: u128 = 0;
const OPCODE_BITS: usize = 32;

/// Decode with the bundled library of well-known schemas.
#[derive(Debug, Clone)]
pub struct BundledLibrary {
	library: Library,
}

impl BundledLibrary {
	pub fn new() -> Result<Self, SchemaError> {
		Ok(Self::with_library(Library::bundled()?))
	}

	pub fn with_library(library: Library) -> Self {
		BundledLibrary { library }
	}
}

impl Strategy for BundledLibrary {
	fn name(&self) -> &'static str {
		"bundled_library"
	}

	fn decode(&self, cell: &Arc<Cell>, _hint: &SchemaHint) -> Result<Value, StrategyError> {
		let value = self.library.deserialize(cell)?;
		Ok(refine_comment(cell, value))
	}
}

/// The generic comment schema matches any opcode. Only a cell that carries text after a zero
/// opcode is a plain comment.
fn refine_comment(cell: &Cell, value: Value) -> Value {
	if value.kind() != Some(TEXT_COMMENT) || cell.bit_len() <= OPCODE_BITS {
		return value;
	}
	let mut slice = cell.parse();
	if slice.load_uint(OPCODE_BITS) != Ok(COMMENT_OPCODE) {
		return value;
	}
	match slice.load_snake_bytes().ok().and_then(|bytes| String::from_utf8(bytes).ok()) {
		Some(text) => Value::Comment(text),
		None => value,
	}
}
