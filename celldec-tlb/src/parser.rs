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

//! Turns schema tokens into raw declarations. Names are not resolved here; that happens when
//! the declarations are assembled into a [`crate::Schema`].

use crate::{
	error::SchemaError,
	lexer::{Spanned, Token},
};
use celldec_common::BitString;

/// A type expression as written, before names are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawType {
	/// `#`
	Nat,
	/// `## n`
	UintN(usize),
	/// A bare number, only meaningful as an argument.
	Number(usize),
	Name(String),
	Ref(Box<RawType>),
	Apply(String, Vec<RawType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawField {
	pub name: Option<String>,
	pub ty: RawType,
	pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawConstructor {
	pub name: Option<String>,
	pub tag: BitString,
	pub fields: Vec<RawField>,
	pub result: String,
	pub line: usize,
}

struct Parser {
	tokens: Vec<Spanned>,
	pos: usize,
}

impl Parser {
	fn peek(&self) -> Option<&Spanned> {
		self.tokens.get(self.pos)
	}

	fn peek_token(&self) -> Option<&Token> {
		self.peek().map(|s| &s.token)
	}

	fn next(&mut self) -> Result<Spanned, SchemaError> {
		let token = self.tokens.get(self.pos).cloned().ok_or_else(|| self.eof())?;
		self.pos += 1;
		Ok(token)
	}

	fn eof(&self) -> SchemaError {
		let (line, column) = self.tokens.last().map(|s| (s.line, s.column)).unwrap_or((1, 1));
		SchemaError::Syntax { line, column, message: "unexpected end of schema".into() }
	}

	fn unexpected(spanned: &Spanned, expected: &str) -> SchemaError {
		match &spanned.token {
			Token::Other(c) => unsupported(spanned.line, *c),
			token => SchemaError::Syntax {
				line: spanned.line,
				column: spanned.column,
				message: format!("expected {}, found {:?}", expected, token),
			},
		}
	}

	fn constructor(&mut self) -> Result<RawConstructor, SchemaError> {
		let head = self.next()?;
		let line = head.line;
		let name = match &head.token {
			Token::Ident(name) if name == "_" => None,
			Token::Ident(name) => Some(name.clone()),
			_ => return Err(Self::unexpected(&head, "a constructor name")),
		};

		let tag = match self.peek_token() {
			Some(Token::HexTag(hex)) => {
				let tag = hex_tag(hex).ok_or_else(|| SchemaError::Syntax {
					line,
					column: head.column,
					message: format!("malformed tag `#{}`", hex),
				})?;
				self.pos += 1;
				tag
			}
			Some(Token::BinTag(bin)) => {
				let tag = bin.chars().filter(|c| *c != '_').map(|c| c == '1').collect();
				self.pos += 1;
				tag
			}
			_ => BitString::new(),
		};

		let mut fields = Vec::new();
		loop {
			match self.peek_token() {
				Some(Token::Equals) => {
					self.pos += 1;
					break;
				}
				Some(_) => fields.push(self.field()?),
				None => return Err(self.eof()),
			}
		}

		let result = self.next()?;
		let result = match &result.token {
			Token::Ident(name) => name.clone(),
			_ => return Err(Self::unexpected(&result, "a result type")),
		};
		let end = self.next()?;
		match &end.token {
			Token::Semicolon => {}
			Token::Ident(_) | Token::Number(_) | Token::Hash | Token::Other('~') => {
				return Err(SchemaError::Unsupported { line: end.line, feature: "parametrized result types".into() })
			}
			_ => return Err(Self::unexpected(&end, "`;`")),
		}

		Ok(RawConstructor { name, tag, fields, result, line })
	}

	fn field(&mut self) -> Result<RawField, SchemaError> {
		let line = self.peek().map(|s| s.line).unwrap_or(1);
		if let Some(Token::Other('{')) = self.peek_token() {
			return Err(SchemaError::Unsupported { line, feature: "implicit parameters".into() });
		}
		let named = matches!(
			(self.peek_token(), self.tokens.get(self.pos + 1).map(|s| &s.token)),
			(Some(Token::Ident(_)), Some(Token::Colon))
		);
		let name = if named {
			let name = match self.next()?.token {
				Token::Ident(name) if name != "_" => Some(name),
				_ => None,
			};
			// the colon
			self.pos += 1;
			name
		} else {
			None
		};
		let ty = self.ty()?;
		Ok(RawField { name, ty, line })
	}

	fn ty(&mut self) -> Result<RawType, SchemaError> {
		let spanned = self.next()?;
		match &spanned.token {
			Token::Caret => Ok(RawType::Ref(Box::new(self.ty()?))),
			Token::Hash => Ok(RawType::Nat),
			Token::DoubleHash => match self.next()? {
				Spanned { token: Token::Number(n), .. } => Ok(RawType::UintN(n)),
				other => Err(Self::unexpected(&other, "a width after `##`")),
			},
			Token::Ident(name) => Ok(RawType::Name(name.clone())),
			Token::LParen => self.parenthesized(spanned.line, spanned.column),
			_ => Err(Self::unexpected(&spanned, "a type")),
		}
	}

	fn parenthesized(&mut self, line: usize, column: usize) -> Result<RawType, SchemaError> {
		let mut items = Vec::new();
		loop {
			match self.peek_token() {
				Some(Token::RParen) => {
					self.pos += 1;
					break;
				}
				Some(Token::Number(n)) => {
					items.push(RawType::Number(*n));
					self.pos += 1;
				}
				Some(_) => items.push(self.ty()?),
				None => return Err(self.eof()),
			}
		}

		let mut items = items.into_iter();
		match (items.next(), items.len()) {
			(Some(single), 0) => Ok(single),
			(Some(RawType::Name(head)), _) => Ok(RawType::Apply(head, items.collect())),
			_ => Err(SchemaError::Syntax { line, column, message: "malformed type application".into() }),
		}
	}
}

fn unsupported(line: usize, c: char) -> SchemaError {
	let feature = match c {
		'{' | '}' => "implicit parameters and constraints".to_string(),
		'~' => "negated type arguments".to_string(),
		'?' => "conditional fields".to_string(),
		'[' | ']' => "anonymous constructors".to_string(),
		other => format!("operator `{}`", other),
	};
	SchemaError::Unsupported { line, feature }
}

/// A hex constructor tag. A trailing `_` marks a completion tag: trailing zeros and the last
/// set bit are dropped.
fn hex_tag(text: &str) -> Option<BitString> {
	let (digits, completion) = match text.strip_suffix('_') {
		Some(digits) => (digits, true),
		None => (text, false),
	};
	let mut tag = BitString::with_capacity(digits.len() * 4);
	for c in digits.chars() {
		let nibble = c.to_digit(16)?;
		for shift in (0..4).rev() {
			tag.push((nibble >> shift) & 1 == 1);
		}
	}
	if completion && !tag.is_empty() {
		let last_one = tag.last_one()?;
		tag.truncate(last_one);
	}
	Some(tag)
}

pub(crate) fn parse(tokens: Vec<Spanned>) -> Result<Vec<RawConstructor>, SchemaError> {
	let mut parser = Parser { tokens, pos: 0 };
	let mut constructors = Vec::new();
	while parser.peek().is_some() {
		constructors.push(parser.constructor()?);
	}
	Ok(constructors)
}
