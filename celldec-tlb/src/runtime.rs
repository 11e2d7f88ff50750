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

//! Reading cells according to a compiled [`Schema`].

use crate::{
	error::TlbError,
	schema::{Constructor, Schema, TypeExpr},
};
use celldec_common::{dict, Cell, CellSlice, Dictionary, Primitive, Value};

/// How deeply type expressions may nest while reading a single value.
pub const MAX_NESTING: usize = 128;

impl Schema {
	/// Read `cell` as whichever declared type consumes it completely. Types are tried from the
	/// last declared to the first, so a schema's "main" type is conventionally declared last.
	pub fn deserialize(&self, cell: &Cell) -> Result<Value, TlbError> {
		if let Some(ty) = cell.exotic_type() {
			return Err(TlbError::Exotic(ty));
		}
		for index in (0..self.types().len()).rev() {
			match read_root(self, cell, &TypeExpr::Named(index)) {
				Ok(value) => return Ok(value),
				Err(e) => log::trace!("`{}` does not match: {}", self.type_at(index).name, e),
			}
		}
		Err(TlbError::NoMatch)
	}

	/// Read `cell` as the declared type `ty`. The whole cell must be consumed.
	pub fn deserialize_as(&self, cell: &Cell, ty: &str) -> Result<Value, TlbError> {
		let index = self.type_index(ty).ok_or_else(|| TlbError::UnknownType(ty.to_string()))?;
		read_root(self, cell, &TypeExpr::Named(index))
	}
}

fn read_root(schema: &Schema, cell: &Cell, ty: &TypeExpr) -> Result<Value, TlbError> {
	if let Some(exotic) = cell.exotic_type() {
		return Err(TlbError::Exotic(exotic));
	}
	let reader = Reader { schema };
	let mut slice = cell.parse();
	let value = reader.read(&mut slice, ty, 0)?;
	ensure_consumed(&slice)?;
	Ok(value)
}

fn ensure_consumed(slice: &CellSlice<'_>) -> Result<(), TlbError> {
	if !slice.is_empty() {
		return Err(TlbError::Trailing { bits: slice.remaining_bits(), refs: slice.remaining_refs() });
	}
	Ok(())
}

struct Reader<'s> {
	schema: &'s Schema,
}

impl<'s> Reader<'s> {
	fn read<'a>(&self, slice: &mut CellSlice<'a>, ty: &TypeExpr, depth: usize) -> Result<Value, TlbError> {
		if depth > MAX_NESTING {
			return Err(TlbError::TooDeep(MAX_NESTING));
		}
		let value = match ty {
			TypeExpr::Uint(bits) => read_uint(slice, *bits)?,
			TypeExpr::Int(bits) => read_int(slice, *bits)?,
			TypeExpr::Bits(bits) => Value::Bits(slice.load_bits(*bits)?),
			TypeExpr::Bool => Value::bool(slice.load_bit()?),
			TypeExpr::VarUint(n) => {
				let len = slice.load_uint(celldec_common::bits::width_lt(*n))? as usize;
				read_uint(slice, len * 8)?
			}
			TypeExpr::VarInt(n) => {
				let len = slice.load_uint(celldec_common::bits::width_lt(*n))? as usize;
				read_int(slice, len * 8)?
			}
			TypeExpr::Address => Value::Address(slice.load_address()?),
			TypeExpr::Cell => Value::Cell(slice.to_cell()?),
			TypeExpr::Text => {
				let bytes = slice.load_snake_bytes()?;
				Value::string(String::from_utf8(bytes).map_err(|_| TlbError::InvalidUtf8)?)
			}
			TypeExpr::Ref(inner) => {
				let child = slice.load_ref()?;
				match inner.as_ref() {
					TypeExpr::Cell => Value::Cell(child.clone()),
					inner => {
						let mut child_slice = child.parse();
						let value = self.read(&mut child_slice, inner, depth + 1)?;
						ensure_consumed(&child_slice)?;
						value
					}
				}
			}
			TypeExpr::Maybe(inner) => {
				if slice.load_bit()? {
					self.read(slice, inner, depth + 1)?
				} else {
					Value::null()
				}
			}
			TypeExpr::Either(left, right) => {
				let branch = if slice.load_bit()? { right } else { left };
				self.read(slice, branch, depth + 1)?
			}
			TypeExpr::HashmapE(key_bits, inner) => {
				let entries = if slice.load_bit()? {
					let root = slice.load_ref()?;
					dict::parse_hashmap(root, *key_bits, |leaf| {
						let value = self.read(leaf, inner, depth + 1)?;
						ensure_consumed(leaf)?;
						Ok::<_, TlbError>(value)
					})?
				} else {
					Vec::new()
				};
				Value::Dictionary(Dictionary::new(*key_bits, entries))
			}
			TypeExpr::Named(index) => self.read_named(slice, *index, depth + 1)?,
		};
		Ok(value)
	}

	/// Try each constructor of a declared type against a copy of `slice`, committing the first
	/// that reads without error.
	fn read_named<'a>(&self, slice: &mut CellSlice<'a>, index: usize, depth: usize) -> Result<Value, TlbError> {
		let def = self.schema.type_at(index);
		for ctor in &def.constructors {
			let mut attempt = *slice;
			match self.read_constructor(&mut attempt, ctor, depth) {
				Ok(fields) => {
					*slice = attempt;
					return Ok(Value::structured(def.kind_of(ctor), fields));
				}
				Err(e) => log::trace!("constructor `{}` of `{}` rejected: {}", def.kind_of(ctor), def.name, e),
			}
		}
		Err(TlbError::NoConstructor(def.name.clone()))
	}

	fn read_constructor<'a>(
		&self,
		slice: &mut CellSlice<'a>,
		ctor: &Constructor,
		depth: usize,
	) -> Result<Vec<(String, Value)>, TlbError> {
		let tag_len = ctor.tag.len();
		if slice.remaining_bits() < tag_len || slice.remaining_data()[..tag_len] != ctor.tag[..] {
			return Err(TlbError::TagMismatch(ctor.name.clone().unwrap_or_else(|| "_".into())));
		}
		slice.skip(tag_len)?;

		let mut fields = Vec::with_capacity(ctor.fields.len());
		for field in &ctor.fields {
			let value = self.read(slice, &field.ty, depth)?;
			if let Some(name) = &field.name {
				fields.push((name.clone(), value));
			}
		}
		Ok(fields)
	}
}

fn read_uint(slice: &mut CellSlice<'_>, bits: usize) -> Result<Value, TlbError> {
	let primitive = match bits {
		0..=64 => Primitive::U64(slice.load_uint(bits)? as u64),
		65..=128 => Primitive::U128(slice.load_uint(bits)?),
		129..=256 => Primitive::U256(slice.load_uint256(bits)?),
		_ => return Err(TlbError::TooWide(bits)),
	};
	Ok(Value::Primitive(primitive))
}

fn read_int(slice: &mut CellSlice<'_>, bits: usize) -> Result<Value, TlbError> {
	let primitive = match bits {
		0..=64 => Primitive::I64(slice.load_int(bits)? as i64),
		65..=128 => Primitive::I128(slice.load_int(bits)?),
		_ => return Err(TlbError::TooWide(bits)),
	};
	Ok(Value::Primitive(primitive))
}

#[cfg(test)]
mod tests {
	use super::*;
	use celldec_common::{bits, CellBuilder, MsgAddress};
	use std::sync::Arc;

	fn schema(text: &str) -> Schema {
		Schema::compile(text).expect("valid schema")
	}

	#[test]
	fn reads_integers_of_every_width() {
		let s = schema("_ a:uint8 b:int8 c:uint100 d:uint200 e:int100 = T;");
		let cell = CellBuilder::new()
			.store_uint(200, 8)
			.unwrap()
			.store_int(-3, 8)
			.unwrap()
			.store_uint(1 << 99, 100)
			.unwrap()
			.store_uint(7, 200)
			.unwrap()
			.store_int(-1, 100)
			.unwrap()
			.build()
			.unwrap();
		let value = s.deserialize(&cell).unwrap();
		assert_eq!(value.field("a"), Some(&Value::u64(200)));
		assert_eq!(value.field("b"), Some(&Value::i64(-3)));
		assert_eq!(value.field("c"), Some(&Value::u128(1 << 99)));
		let mut seven = [0u8; 32];
		seven[31] = 7;
		assert_eq!(value.field("d"), Some(&Value::Primitive(Primitive::U256(seven))));
		assert_eq!(value.field("e"), Some(&Value::Primitive(Primitive::I128(-1))));
	}

	#[test]
	fn tags_select_constructors() {
		let _ = pretty_env_logger::try_init();
		let s = schema("small$0 x:uint4 = N; big$1 x:uint8 = N;");
		let big = CellBuilder::new().store_bit(true).unwrap().store_uint(0xab, 8).unwrap().build().unwrap();
		let value = s.deserialize(&big).unwrap();
		assert_eq!(value.kind(), Some("big"));
		assert_eq!(value.field("x"), Some(&Value::u64(0xab)));
	}

	#[test]
	fn trailing_data_fails() {
		let s = schema("_ x:uint4 = N;");
		let cell = CellBuilder::new().store_uint(0, 5).unwrap().build().unwrap();
		assert_eq!(s.deserialize_as(&cell, "N").unwrap_err(), TlbError::Trailing { bits: 1, refs: 0 });
		assert_eq!(s.deserialize(&cell).unwrap_err(), TlbError::NoMatch);
		assert_eq!(s.deserialize_as(&cell, "Other").unwrap_err(), TlbError::UnknownType("Other".into()));
	}

	#[test]
	fn references_and_combinators() {
		let s = schema(
			"
			inner$_ v:uint8 = Inner;
			outer#01 a:^Inner b:(Maybe uint8) c:(Either uint4 ^Cell) raw:^Cell addr:MsgAddress coins:Coins = Outer;
			",
		);
		let inner = CellBuilder::new().store_uint(9, 8).unwrap().build().unwrap();
		let raw = Arc::new(Cell::empty());
		let address = MsgAddress::std(0, [0x11; 32]);
		let cell = CellBuilder::new()
			.store_uint(0x01, 8)
			.unwrap()
			.store_ref(inner)
			.unwrap()
			.store_bit(false)
			.unwrap()
			.store_bit(true)
			.unwrap()
			.store_ref(raw.clone())
			.unwrap()
			.store_ref(raw.clone())
			.unwrap()
			.store_address(&address)
			.unwrap()
			.store_coins(1_000_000_000)
			.unwrap()
			.build()
			.unwrap();
		let value = s.deserialize(&cell).unwrap();
		assert_eq!(value.kind(), Some("outer"));
		assert_eq!(value.field("a"), Some(&Value::structured("inner", vec![("v".into(), Value::u64(9))])));
		assert_eq!(value.field("b"), Some(&Value::null()));
		assert_eq!(value.field("c"), Some(&Value::Cell(raw.clone())));
		assert_eq!(value.field("raw"), Some(&Value::Cell(raw)));
		assert_eq!(value.field("addr"), Some(&Value::Address(address)));
		assert_eq!(value.field("coins"), Some(&Value::u64(1_000_000_000)));
	}

	#[test]
	fn dictionaries_become_entries_by_key() {
		let s = schema("_ d:(HashmapE 8 uint16) = D;");
		// hml_same$11 v:0 n:(#<= 8) = 8: a single entry with key 0
		let root = CellBuilder::new()
			.store_uint(0b110, 3)
			.unwrap()
			.store_uint(8, 4)
			.unwrap()
			.store_uint(500, 16)
			.unwrap()
			.build()
			.unwrap();
		let cell = CellBuilder::new().store_bit(true).unwrap().store_ref(root).unwrap().build().unwrap();
		let value = s.deserialize(&cell).unwrap();
		match value.field("d") {
			Some(Value::Dictionary(dict)) => {
				assert_eq!(dict.key_bits, 8);
				assert_eq!(dict.entries, vec![(bits::from_bytes(&[0], 8), Value::u64(500))]);
			}
			other => panic!("expected a dictionary, got {:?}", other),
		}
	}

	#[test]
	fn text_is_snake_utf8() {
		let s = schema("msg#00000000 text:Text = Msg;");
		let cell = CellBuilder::new().store_uint(0, 32).unwrap().store_bytes("héllo".as_bytes()).unwrap().build().unwrap();
		assert_eq!(s.deserialize(&cell).unwrap().field("text"), Some(&Value::string("héllo")));

		let bad = CellBuilder::new().store_uint(0, 32).unwrap().store_bytes(&[0xff, 0xfe]).unwrap().build().unwrap();
		assert!(s.deserialize(&bad).is_err());
	}

	#[test]
	fn recursive_types_hit_the_nesting_limit() {
		let s = schema("_ next:Loop = Loop;");
		let cell = Cell::empty();
		assert_eq!(s.deserialize_as(&cell, "Loop").unwrap_err(), TlbError::NoConstructor("Loop".into()));
	}

	#[test]
	fn exotic_cells_never_match() {
		let s = schema("_ rest:Cell = Any;");
		let data = bits::from_bytes(&[3; 35], 280);
		let cell = Cell::exotic(data, vec![Arc::new(Cell::empty())], 0).unwrap();
		assert_eq!(s.deserialize(&cell).unwrap_err(), TlbError::Exotic(3));
		assert_eq!(s.deserialize_as(&cell, "Any").unwrap_err(), TlbError::Exotic(3));
	}
}
