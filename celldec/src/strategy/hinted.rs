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
use std::sync::Arc;

/// Decode with the caller's schema hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintedSchema;

impl Strategy for HintedSchema {
	fn name(&self) -> &'static str {
		"hinted_schema"
	}

	fn applies(&self, hint: &SchemaHint) -> bool {
		!hint.is_empty()
	}

	fn decode(&self, cell: &Arc<Cell>, hint: &SchemaHint) -> Result<Value, StrategyError> {
		let schema = hint.schema()?;
		Ok(schema.deserialize(cell)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use celldec_common::CellBuilder;
	use celldec_tlb::SchemaError;

	#[test]
	fn decodes_with_hint() {
		let cell = CellBuilder::new().store_uint(0x2a, 8).unwrap().build().unwrap();
		let value = HintedSchema.decode(&cell, &"answer$_ n:uint8 = Answer;".into()).unwrap();
		assert_eq!(value.kind(), Some("answer"));
		assert_eq!(value.field("n"), Some(&Value::u64(42)));
	}

	#[test]
	fn broken_hint_is_an_error() {
		let cell = CellBuilder::new().build().unwrap();
		let err = HintedSchema.decode(&cell, &"a x:Nope = A;".into()).unwrap_err();
		assert_eq!(err, StrategyError::Schema(SchemaError::UnknownType("Nope".into())));
		assert!(!HintedSchema.applies(&SchemaHint::none()));
	}
}
