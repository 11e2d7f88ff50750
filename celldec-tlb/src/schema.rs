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
The compiled form of a schema. [`Schema::compile`] takes TL-B text, parses it, and resolves
every type name against the declared types and the built-in ones, so deserializing never has
to look anything up by name.

Supported built-in types:

| Name | Meaning |
| --- | --- |
| `#`, `## n`, `uintN`, `intN` | fixed width integers |
| `bitsN`, `Bit` | raw bit strings |
| `Bool` | a single bit |
| `VarUInteger n`, `VarInteger n`, `Coins`, `Grams` | length prefixed integers |
| `MsgAddress`, `MsgAddressInt`, `MsgAddressExt` | addresses |
| `Cell`, `Any` | the rest of the cell |
| `Text`, `SnakeText` | snake-encoded UTF-8 |
| `Maybe X`, `Either X Y`, `HashmapE n X`, `^X` | combinators |
*/

use crate::{
	error::SchemaError,
	lexer,
	parser::{self, RawConstructor, RawType},
};
use celldec_common::{BitString, MAX_BITS};
use std::collections::HashMap;

/// A resolved type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
	Uint(usize),
	Int(usize),
	Bits(usize),
	Bool,
	/// `VarUInteger n`: a length of `#< n` bytes followed by that many bytes.
	VarUint(usize),
	VarInt(usize),
	Address,
	/// Whatever is left of the current cell.
	Cell,
	Text,
	Ref(Box<TypeExpr>),
	Maybe(Box<TypeExpr>),
	Either(Box<TypeExpr>, Box<TypeExpr>),
	HashmapE(usize, Box<TypeExpr>),
	/// A type declared in the schema, by index into [`Schema::types`].
	Named(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	/// `None` for anonymous (`_`) fields, which are read but not reported.
	pub name: Option<String>,
	pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
	/// The constructor name, or `None` for `_`.
	pub name: Option<String>,
	pub tag: BitString,
	pub fields: Vec<Field>,
}

/// All constructors declared for one result type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
	pub name: String,
	pub constructors: Vec<Constructor>,
}

impl TypeDef {
	/// The name a value built by `constructor` is reported under.
	pub fn kind_of<'a>(&'a self, constructor: &'a Constructor) -> &'a str {
		constructor.name.as_deref().unwrap_or(&self.name)
	}
}

/// A compiled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
	types: Vec<TypeDef>,
	index: HashMap<String, usize>,
}

const MAX_UINT: usize = 256;
const MAX_INT: usize = 128;
const MAX_VAR_UINT: usize = 32;
const MAX_VAR_INT: usize = 17;

impl Schema {
	/// Parse and resolve schema text.
	pub fn compile(text: &str) -> Result<Self, SchemaError> {
		let raw = parser::parse(lexer::tokenize(text)?)?;
		if raw.is_empty() {
			return Err(SchemaError::Empty);
		}

		let mut index = HashMap::new();
		let mut names = Vec::new();
		for ctor in &raw {
			if !index.contains_key(&ctor.result) {
				index.insert(ctor.result.clone(), names.len());
				names.push(ctor.result.clone());
			}
		}

		let mut types: Vec<TypeDef> =
			names.into_iter().map(|name| TypeDef { name, constructors: Vec::new() }).collect();
		for ctor in raw {
			let target = index[&ctor.result];
			let resolved = resolve_constructor(&index, ctor)?;
			types[target].constructors.push(resolved);
		}

		log::debug!("compiled schema with {} types", types.len());
		Ok(Schema { types, index })
	}

	/// Declared types in declaration order.
	pub fn types(&self) -> &[TypeDef] {
		&self.types
	}

	pub fn type_index(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	pub fn get(&self, name: &str) -> Option<&TypeDef> {
		self.type_index(name).map(|i| &self.types[i])
	}

	pub(crate) fn type_at(&self, index: usize) -> &TypeDef {
		&self.types[index]
	}
}

fn resolve_constructor(index: &HashMap<String, usize>, ctor: RawConstructor) -> Result<Constructor, SchemaError> {
	let fields = ctor
		.fields
		.into_iter()
		.map(|field| {
			let ty = resolve(index, &field.ty)?;
			Ok(Field { name: field.name, ty })
		})
		.collect::<Result<_, SchemaError>>()?;
	Ok(Constructor { name: ctor.name, tag: ctor.tag, fields })
}

fn resolve(index: &HashMap<String, usize>, raw: &RawType) -> Result<TypeExpr, SchemaError> {
	match raw {
		RawType::Nat => Ok(TypeExpr::Uint(32)),
		RawType::UintN(n) => width("##", *n, MAX_UINT).map(TypeExpr::Uint),
		RawType::Number(n) => Err(SchemaError::UnknownType(n.to_string())),
		RawType::Ref(inner) => Ok(TypeExpr::Ref(Box::new(resolve(index, inner)?))),
		RawType::Name(name) => match index.get(name) {
			Some(i) => Ok(TypeExpr::Named(*i)),
			None => builtin(name),
		},
		RawType::Apply(head, args) => apply(index, head, args),
	}
}

fn width(ty: &str, n: usize, max: usize) -> Result<usize, SchemaError> {
	if n > max {
		return Err(SchemaError::InvalidWidth { ty: ty.to_string(), width: n });
	}
	Ok(n)
}

fn builtin(name: &str) -> Result<TypeExpr, SchemaError> {
	let ty = match name {
		"Bool" => TypeExpr::Bool,
		"Bit" => TypeExpr::Bits(1),
		"Coins" | "Grams" => TypeExpr::VarUint(16),
		"MsgAddress" | "MsgAddressInt" | "MsgAddressExt" => TypeExpr::Address,
		"Cell" | "Any" => TypeExpr::Cell,
		"Text" | "SnakeText" => TypeExpr::Text,
		_ => {
			let sized = [("uint", MAX_UINT), ("int", MAX_INT), ("bits", MAX_BITS)]
				.into_iter()
				.find_map(|(prefix, max)| Some((prefix, max, name.strip_prefix(prefix)?.parse::<usize>().ok()?)));
			match sized {
				Some(("uint", max, n)) => TypeExpr::Uint(width(name, n, max)?),
				Some(("int", max, n)) => TypeExpr::Int(width(name, n, max)?),
				Some((_, max, n)) => TypeExpr::Bits(width(name, n, max)?),
				None => return Err(SchemaError::UnknownType(name.to_string())),
			}
		}
	};
	Ok(ty)
}

fn apply(index: &HashMap<String, usize>, head: &str, args: &[RawType]) -> Result<TypeExpr, SchemaError> {
	let number = |arg: &RawType| match arg {
		RawType::Number(n) => Ok(*n),
		_ => Err(SchemaError::UnknownType(format!("{} with a non-numeric argument", head))),
	};
	let ty = match (head, args) {
		("Maybe", [inner]) => TypeExpr::Maybe(Box::new(resolve(index, inner)?)),
		("Either", [left, right]) => TypeExpr::Either(Box::new(resolve(index, left)?), Box::new(resolve(index, right)?)),
		("HashmapE", [n, value]) => TypeExpr::HashmapE(width(head, number(n)?, MAX_BITS)?, Box::new(resolve(index, value)?)),
		("VarUInteger", [n]) => TypeExpr::VarUint(width(head, number(n)?, MAX_VAR_UINT)?),
		("VarInteger", [n]) => TypeExpr::VarInt(width(head, number(n)?, MAX_VAR_INT)?),
		_ => return Err(SchemaError::UnknownType(format!("{} applied to {} arguments", head, args.len()))),
	};
	Ok(ty)
}
