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

//! Conversion of decoded values into plain JSON.
//!
//! Integers outside the range a double represents exactly become decimal strings, bit
//! strings become hex, addresses their canonical string, and raw cells the hex of their
//! serialized bag of cells.

use celldec_common::{bits, value::be_bytes_to_decimal, MsgAddress, Primitive, Value};
use serde_json::{Map, Value as Json};

/// The largest integer a JSON consumer can read back exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

pub fn sanitize(value: &Value) -> Json {
	match value {
		Value::Primitive(p) => primitive(p),
		Value::Bits(b) => Json::String(bits::to_hex(b)),
		Value::Address(MsgAddress::None) => Json::Null,
		Value::Address(a) => Json::String(a.to_string()),
		Value::List(items) => Json::Array(items.iter().map(sanitize).collect()),
		Value::Structured(s) => {
			let mut map = Map::new();
			map.insert("kind".into(), Json::String(s.kind.clone()));
			for (name, field) in &s.fields {
				map.insert(name.clone(), sanitize(field));
			}
			Json::Object(map)
		}
		Value::Dictionary(dict) => object(dict.flatten().iter().map(|(k, v)| (k.as_str(), v))),
		Value::Entries(entries) => object(entries.iter().map(|(k, v)| (k.as_str(), v))),
		Value::Comment(text) => tagged("comment", text),
		Value::Assembler(text) => tagged("assembler", text),
		Value::Cell(cell) => Json::String(cell.to_boc_hex()),
		Value::Expanded(expanded) => {
			let mut map = Map::new();
			map.insert("data".into(), Json::String(expanded.data.clone()));
			map.insert("parsed".into(), sanitize(&expanded.parsed));
			Json::Object(map)
		}
	}
}

/// Sanitize an already JSON value. Everything [`sanitize`] produces comes back unchanged.
pub fn sanitize_json(value: &Json) -> Json {
	match value {
		Json::Number(n) => match (n.as_u64(), n.as_i64()) {
			(Some(u), _) => unsigned(u as u128),
			(None, Some(i)) => signed(i as i128),
			(None, None) => Json::Number(n.clone()),
		},
		Json::Array(items) => Json::Array(items.iter().map(sanitize_json).collect()),
		Json::Object(map) => Json::Object(map.iter().map(|(k, v)| (k.clone(), sanitize_json(v))).collect()),
		other => other.clone(),
	}
}

fn object<'a, I>(entries: I) -> Json
where
	I: Iterator<Item = (&'a str, &'a Value)>,
{
	Json::Object(entries.map(|(k, v)| (k.to_string(), sanitize(v))).collect())
}

fn tagged(kind: &str, text: &str) -> Json {
	let mut map = Map::new();
	map.insert("kind".into(), Json::String(kind.to_string()));
	map.insert("text".into(), Json::String(text.to_string()));
	Json::Object(map)
}

fn primitive(p: &Primitive) -> Json {
	match p {
		Primitive::Null => Json::Null,
		Primitive::Bool(b) => Json::Bool(*b),
		Primitive::Str(s) => Json::String(s.clone()),
		Primitive::U64(n) => unsigned(*n as u128),
		Primitive::I64(n) => signed(*n as i128),
		Primitive::U128(n) => unsigned(*n),
		Primitive::I128(n) => signed(*n),
		Primitive::U256(bytes) => {
			if bytes[..16].iter().all(|b| *b == 0) {
				let mut low = [0u8; 16];
				low.copy_from_slice(&bytes[16..]);
				unsigned(u128::from_be_bytes(low))
			} else {
				Json::String(be_bytes_to_decimal(bytes))
			}
		}
	}
}

fn unsigned(n: u128) -> Json {
	if n <= MAX_SAFE_INTEGER as u128 {
		Json::from(n as u64)
	} else {
		Json::String(n.to_string())
	}
}

fn signed(n: i128) -> Json {
	if n.unsigned_abs() <= MAX_SAFE_INTEGER as u128 {
		Json::from(n as i64)
	} else {
		Json::String(n.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use celldec_common::{CellBuilder, Dictionary, ExpandedCell};
	use serde_json::json;

	#[test]
	fn large_integers_become_strings() {
		assert_eq!(sanitize(&Value::u64(42)), json!(42));
		assert_eq!(sanitize(&Value::u64(MAX_SAFE_INTEGER + 1)), json!("9007199254740992"));
		assert_eq!(sanitize(&Value::i64(-5)), json!(-5));
		assert_eq!(sanitize(&Value::u128(u128::MAX)), json!(u128::MAX.to_string()));
		assert_eq!(sanitize(&Value::Primitive(Primitive::U256([0xff; 32]))).as_str().map(str::len), Some(78));
	}

	#[test]
	fn structures_and_cells() {
		let cell = CellBuilder::new().store_uint(0xab, 8).unwrap().build().unwrap();
		let value = Value::structured(
			"wrap",
			vec![
				("raw".into(), Value::Cell(cell.clone())),
				("seen".into(), Value::Expanded(Box::new(ExpandedCell::new(cell.clone(), Value::Comment("x".into()))))),
				("addr".into(), Value::Address(MsgAddress::None)),
				("dict".into(), Value::Dictionary(Dictionary::new(8, vec![(bits::from_bytes(&[1], 8), Value::bool(true))]))),
			],
		);
		assert_eq!(
			sanitize(&value),
			json!({
				"kind": "wrap",
				"raw": cell.to_boc_hex(),
				"seen": { "data": cell.to_boc_hex(), "parsed": { "kind": "comment", "text": "x" } },
				"addr": null,
				"dict": { "1": true },
			})
		);
	}

	#[test]
	fn sanitizing_twice_changes_nothing() {
		let value = Value::List(vec![
			Value::u128(1 << 100),
			Value::i64(i64::MIN),
			Value::Bits(bits::from_bytes(&[0xf0], 4)),
			Value::Comment("hi".into()),
		]);
		let once = sanitize(&value);
		assert_eq!(sanitize_json(&once), once);
		assert_eq!(sanitize_json(&json!(u64::MAX)), json!(u64::MAX.to_string()));
	}
}
