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

/*!
This module exposes the [`Value`] type, the runtime representation of whatever a decoder made of
a cell. Every decoding backend produces it, and every later stage (expansion, sanitization,
display) matches on it exhaustively.
*/

use crate::{
	address::MsgAddress,
	bits::{self, BitString, Bits},
	cell::Cell,
};
use std::{fmt, sync::Arc};

/// The result of interpreting a cell.
///
/// A value that still contains a [`Value::Cell`] somewhere inside it is not fully expanded:
/// that reference may decode into something more meaningful.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Any of the primitive values we can have.
	Primitive(Primitive),
	/// A bit string that is not an integer (`bitsN`).
	Bits(BitString),
	/// A message address.
	Address(MsgAddress),
	/// An ordered sequence of values.
	List(Vec<Value>),
	/// A constructor with named fields.
	Structured(Structured),
	/// A dictionary straight out of a decoder, keyed by raw key bits.
	Dictionary(Dictionary),
	/// A dictionary flattened into readable keys.
	Entries(Vec<(String, Value)>),
	/// A plain text comment.
	Comment(String),
	/// Disassembled code.
	Assembler(String),
	/// A raw cell reference awaiting interpretation.
	Cell(Arc<Cell>),
	/// A cell reference that has been interpreted.
	Expanded(Box<ExpandedCell>),
}

/// A "primitive" value (this includes strings).
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
	Null,
	Bool(bool),
	Str(String),
	U64(u64),
	I64(i64),
	U128(u128),
	I128(i128),
	/// A 256 bit unsigned integer as big-endian bytes.
	U256([u8; 32]),
}

/// A constructor name together with its fields, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Structured {
	pub kind: String,
	pub fields: Vec<(String, Value)>,
}

/// Dictionary entries keyed by `key_bits` long bit strings, in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
	pub key_bits: usize,
	pub entries: Vec<(BitString, Value)>,
}

/// A cell reference together with what it decoded to.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedCell {
	/// The original cell.
	pub cell: Arc<Cell>,
	/// Hex of the cell serialized as a bag of cells.
	pub data: String,
	/// The decoded value.
	pub parsed: Value,
}

impl ExpandedCell {
	pub fn new(cell: Arc<Cell>, parsed: Value) -> Self {
		let data = cell.to_boc_hex();
		ExpandedCell { cell, data, parsed }
	}
}

impl Dictionary {
	pub fn new(key_bits: usize, entries: Vec<(BitString, Value)>) -> Self {
		Dictionary { key_bits, entries }
	}

	/// A readable form of a key: decimal when it fits into 128 bits, hex otherwise.
	pub fn key_string(key: &Bits) -> String {
		if key.len() <= 128 {
			bits::to_u128(key).to_string()
		} else {
			bits::to_hex(key)
		}
	}

	/// The entries keyed by [`Dictionary::key_string`].
	pub fn flatten(&self) -> Vec<(String, Value)> {
		self.entries.iter().map(|(key, value)| (Self::key_string(key), value.clone())).collect()
	}
}

impl Value {
	pub fn structured<S: Into<String>>(kind: S, fields: Vec<(String, Value)>) -> Self {
		Value::Structured(Structured { kind: kind.into(), fields })
	}

	pub fn null() -> Self {
		Value::Primitive(Primitive::Null)
	}

	pub fn string<S: Into<String>>(s: S) -> Self {
		Value::Primitive(Primitive::Str(s.into()))
	}

	pub fn bool(b: bool) -> Self {
		Value::Primitive(Primitive::Bool(b))
	}

	pub fn u64(n: u64) -> Self {
		Value::Primitive(Primitive::U64(n))
	}

	pub fn i64(n: i64) -> Self {
		Value::Primitive(Primitive::I64(n))
	}

	pub fn u128(n: u128) -> Self {
		Value::Primitive(Primitive::U128(n))
	}

	pub fn cell(cell: Arc<Cell>) -> Self {
		Value::Cell(cell)
	}

	/// The constructor name of a structured value.
	pub fn kind(&self) -> Option<&str> {
		match self {
			Value::Structured(s) => Some(&s.kind),
			_ => None,
		}
	}

	/// Look up a named field of a structured value, or an entry of a flattened dictionary.
	pub fn field(&self, name: &str) -> Option<&Value> {
		let fields = match self {
			Value::Structured(s) => &s.fields,
			Value::Entries(entries) => entries,
			_ => return None,
		};
		fields.iter().find(|(key, _)| key == name).map(|(_, value)| value)
	}

	/// Does this value still hold a raw cell reference anywhere inside it?
	pub fn has_raw_cells(&self) -> bool {
		match self {
			Value::Cell(_) => true,
			Value::List(items) => items.iter().any(Value::has_raw_cells),
			Value::Structured(s) => s.fields.iter().any(|(_, v)| v.has_raw_cells()),
			Value::Entries(entries) => entries.iter().any(|(_, v)| v.has_raw_cells()),
			Value::Dictionary(dict) => dict.entries.iter().any(|(_, v)| v.has_raw_cells()),
			Value::Expanded(expanded) => expanded.parsed.has_raw_cells(),
			Value::Primitive(_)
			| Value::Bits(_)
			| Value::Address(_)
			| Value::Comment(_)
			| Value::Assembler(_) => false,
		}
	}
}

impl From<Primitive> for Value {
	fn from(val: Primitive) -> Self {
		Value::Primitive(val)
	}
}

impl From<Structured> for Value {
	fn from(val: Structured) -> Self {
		Value::Structured(val)
	}
}

impl From<MsgAddress> for Value {
	fn from(val: MsgAddress) -> Self {
		Value::Address(val)
	}
}

impl From<Arc<Cell>> for Value {
	fn from(val: Arc<Cell>) -> Self {
		Value::Cell(val)
	}
}

/// Decimal digits of a big-endian unsigned integer of any width.
pub fn be_bytes_to_decimal(bytes: &[u8]) -> String {
	let mut number: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
	if number.is_empty() {
		return "0".to_string();
	}
	let mut digits = Vec::new();
	while !number.is_empty() {
		let mut remainder = 0u32;
		for byte in number.iter_mut() {
			let current = (remainder << 8) | *byte as u32;
			*byte = (current / 10) as u8;
			remainder = current % 10;
		}
		digits.push(char::from(b'0' + remainder as u8));
		let leading = number.iter().take_while(|b| **b == 0).count();
		number.drain(..leading);
	}
	digits.iter().rev().collect()
}

impl fmt::Display for Primitive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Primitive::Null => write!(f, "null"),
			Primitive::Bool(b) => write!(f, "{}", b),
			Primitive::Str(s) => write!(f, "{:?}", s),
			Primitive::U64(n) => write!(f, "{}", n),
			Primitive::I64(n) => write!(f, "{}", n),
			Primitive::U128(n) => write!(f, "{}", n),
			Primitive::I128(n) => write!(f, "{}", n),
			Primitive::U256(bytes) => write!(f, "{}", be_bytes_to_decimal(bytes)),
		}
	}
}

fn fmt_fields<'a, I>(f: &mut fmt::Formatter<'_>, fields: I) -> fmt::Result
where
	I: IntoIterator<Item = (&'a str, &'a Value)>,
{
	write!(f, "{{")?;
	for (i, (name, value)) in fields.into_iter().enumerate() {
		if i > 0 {
			write!(f, ", ")?;
		}
		write!(f, "{}: {}", name, value)?;
	}
	write!(f, "}}")
}

/// A compact single line rendering. Raw cells are shown by hash.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Primitive(p) => write!(f, "{}", p),
			Value::Bits(b) => write!(f, "x{{{}}}", bits::to_hex(b)),
			Value::Address(a) => write!(f, "{}", a),
			Value::List(items) => {
				write!(f, "[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}", item)?;
				}
				write!(f, "]")
			}
			Value::Structured(s) => {
				write!(f, "{} ", s.kind)?;
				fmt_fields(f, s.fields.iter().map(|(k, v)| (k.as_str(), v)))
			}
			Value::Dictionary(dict) => {
				let entries: Vec<(String, &Value)> =
					dict.entries.iter().map(|(k, v)| (Dictionary::key_string(k), v)).collect();
				fmt_fields(f, entries.iter().map(|(k, v)| (k.as_str(), *v)))
			}
			Value::Entries(entries) => fmt_fields(f, entries.iter().map(|(k, v)| (k.as_str(), v))),
			Value::Comment(text) => write!(f, "comment {:?}", text),
			Value::Assembler(text) => write!(f, "{}", text),
			Value::Cell(cell) => write!(f, "cell {}", cell.hash_hex()),
			Value::Expanded(expanded) => write!(f, "{}", expanded.parsed),
		}
	}
}
