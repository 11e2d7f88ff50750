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

//! Pieces shared by several layouts.

use crate::error::BlockError;
use celldec_common::{dict, Cell, CellSlice, Dictionary, Primitive, Value};

/// Reads the fields of one layout in order, collecting them under their names.
pub(crate) struct Reader<'a> {
	layout: &'static str,
	slice: CellSlice<'a>,
	fields: Vec<(String, Value)>,
}

impl<'a> Reader<'a> {
	pub fn new(layout: &'static str, cell: &'a Cell) -> Self {
		Reader { layout, slice: cell.parse(), fields: Vec::new() }
	}

	/// Check and skip a leading tag.
	pub fn tag(&mut self, expected: u128, bits: usize) -> Result<(), BlockError> {
		let found = self.slice.load_uint(bits)?;
		if found != expected {
			return Err(BlockError::InvalidTag { layout: self.layout, found });
		}
		Ok(())
	}

	pub fn slice(&mut self) -> &mut CellSlice<'a> {
		&mut self.slice
	}

	pub fn push(&mut self, name: &str, value: Value) {
		self.fields.push((name.to_string(), value));
	}

	pub fn uint(&mut self, name: &str, bits: usize) -> Result<u64, BlockError> {
		let value = self.slice.load_uint(bits)? as u64;
		self.push(name, Value::u64(value));
		Ok(value)
	}

	pub fn int(&mut self, name: &str, bits: usize) -> Result<i64, BlockError> {
		let value = self.slice.load_int(bits)? as i64;
		self.push(name, Value::i64(value));
		Ok(value)
	}

	pub fn flag(&mut self, name: &str) -> Result<bool, BlockError> {
		let value = self.slice.load_bit()?;
		self.push(name, Value::bool(value));
		Ok(value)
	}

	pub fn bits(&mut self, name: &str, bits: usize) -> Result<(), BlockError> {
		let value = self.slice.load_bits(bits)?;
		self.push(name, Value::Bits(value));
		Ok(())
	}

	/// A child reference, left raw for the caller to decode.
	pub fn reference(&mut self, name: &str) -> Result<(), BlockError> {
		let child = self.slice.load_ref()?.clone();
		self.push(name, Value::Cell(child));
		Ok(())
	}

	/// `(Maybe ^X)`, raw.
	pub fn maybe_reference(&mut self, name: &str) -> Result<(), BlockError> {
		if self.slice.load_bit()? {
			self.reference(name)
		} else {
			self.push(name, Value::null());
			Ok(())
		}
	}

	pub fn shard_ident(&mut self, name: &str) -> Result<(), BlockError> {
		let value = shard_ident(&mut self.slice)?;
		self.push(name, value);
		Ok(())
	}

	pub fn currencies(&mut self, name: &str) -> Result<(), BlockError> {
		let value = currency_collection(&mut self.slice)?;
		self.push(name, value);
		Ok(())
	}

	/// Read a child reference with `read` and store the result under `name`. The child must
	/// be consumed completely.
	pub fn nested<F>(&mut self, name: &str, layout: &'static str, read: F) -> Result<(), BlockError>
	where
		F: FnOnce(&mut Reader<'a>) -> Result<(), BlockError>,
	{
		let child = self.slice.load_ref()?;
		let mut reader = Reader::new(layout, child);
		read(&mut reader)?;
		let value = reader.finish()?;
		self.push(name, value);
		Ok(())
	}

	/// Every bit and reference must have been read.
	pub fn finish(self) -> Result<Value, BlockError> {
		if !self.slice.is_empty() {
			return Err(BlockError::Trailing {
				layout: self.layout,
				bits: self.slice.remaining_bits(),
				refs: self.slice.remaining_refs(),
			});
		}
		Ok(Value::structured(self.layout, self.fields))
	}
}

/// `shard_ident$00 shard_pfx_bits:(#<= 60) workchain_id:int32 shard_prefix:uint64 = ShardIdent;`
pub(crate) fn shard_ident(slice: &mut CellSlice<'_>) -> Result<Value, BlockError> {
	let tag = slice.load_uint(2)?;
	if tag != 0 {
		return Err(BlockError::InvalidTag { layout: "shard_ident", found: tag });
	}
	let pfx_bits = slice.load_uint_leq(60)?;
	let workchain = slice.load_int(32)? as i64;
	let prefix = slice.load_uint(64)? as u64;
	Ok(Value::structured(
		"shard_ident",
		vec![
			("shard_pfx_bits".into(), Value::u64(pfx_bits as u64)),
			("workchain_id".into(), Value::i64(workchain)),
			("shard_prefix".into(), Value::u64(prefix)),
		],
	))
}

/// `currencies$_ grams:Grams other:(HashmapE 32 (VarUInteger 32)) = CurrencyCollection;`
pub(crate) fn currency_collection(slice: &mut CellSlice<'_>) -> Result<Value, BlockError> {
	let grams = slice.load_coins()?;
	let other = if slice.load_bit()? {
		let root = slice.load_ref()?;
		dict::parse_hashmap(root, 32, |leaf| {
			let bytes = leaf.load_var_uint_bytes(5)?;
			Ok::<_, BlockError>(Value::Primitive(wide_uint(&bytes)))
		})?
	} else {
		Vec::new()
	};
	Ok(Value::structured(
		"currencies",
		vec![
			("grams".into(), Value::Primitive(Primitive::U128(grams))),
			("other".into(), Value::Dictionary(Dictionary::new(32, other))),
		],
	))
}

fn wide_uint(bytes: &[u8]) -> Primitive {
	if bytes.len() <= 16 {
		Primitive::U128(bytes.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128))
	} else {
		let mut out = [0u8; 32];
		out[32 - bytes.len()..].copy_from_slice(bytes);
		Primitive::U256(out)
	}
}
