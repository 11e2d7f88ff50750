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

use crate::error::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
	Ident(String),
	Number(usize),
	/// `#` followed by hex digits, e.g. the `#0f8a7ea5` of `transfer#0f8a7ea5`.
	HexTag(String),
	/// `$` followed by binary digits.
	BinTag(String),
	/// `#` on its own: the 32-bit natural number type.
	Hash,
	/// `##`, an unsigned integer of the following width.
	DoubleHash,
	Colon,
	Equals,
	Semicolon,
	LParen,
	RParen,
	Caret,
	/// Punctuation from parts of the language we don't support (`{`, `~`, `?` ...).
	Other(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
	pub token: Token,
	pub line: usize,
	pub column: usize,
}

struct Lexer {
	chars: Vec<char>,
	pos: usize,
	line: usize,
	column: usize,
}

impl Lexer {
	fn peek(&self) -> Option<char> {
		self.chars.get(self.pos).copied()
	}

	fn peek_next(&self) -> Option<char> {
		self.chars.get(self.pos + 1).copied()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += 1;
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	fn take_while(&mut self, f: impl Fn(char) -> bool) -> String {
		let mut out = String::new();
		while let Some(c) = self.peek().filter(|c| f(*c)) {
			out.push(c);
			self.bump();
		}
		out
	}

	fn error(&self, message: impl Into<String>) -> SchemaError {
		SchemaError::Syntax { line: self.line, column: self.column, message: message.into() }
	}

	/// Skip whitespace and comments.
	fn skip_trivia(&mut self) -> Result<(), SchemaError> {
		loop {
			match (self.peek(), self.peek_next()) {
				(Some(c), _) if c.is_whitespace() => {
					self.bump();
				}
				(Some('/'), Some('/')) => {
					self.take_while(|c| c != '\n');
				}
				(Some('/'), Some('*')) => {
					self.bump();
					self.bump();
					loop {
						match (self.peek(), self.peek_next()) {
							(Some('*'), Some('/')) => {
								self.bump();
								self.bump();
								break;
							}
							(Some(_), _) => {
								self.bump();
							}
							(None, _) => return Err(self.error("unterminated comment")),
						}
					}
				}
				_ => return Ok(()),
			}
		}
	}
}

fn is_ident_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Spanned>, SchemaError> {
	let mut lexer = Lexer { chars: text.chars().collect(), pos: 0, line: 1, column: 1 };
	let mut tokens = Vec::new();

	loop {
		lexer.skip_trivia()?;
		let (line, column) = (lexer.line, lexer.column);
		let c = match lexer.peek() {
			Some(c) => c,
			None => break,
		};

		let token = if c.is_ascii_alphabetic() || c == '_' {
			Token::Ident(lexer.take_while(is_ident_char))
		} else if c.is_ascii_digit() {
			let digits = lexer.take_while(|c| c.is_ascii_digit());
			Token::Number(digits.parse().map_err(|_| lexer.error(format!("number `{}` is too large", digits)))?)
		} else if c == '#' {
			lexer.bump();
			match lexer.peek() {
				Some('#') => {
					lexer.bump();
					Token::DoubleHash
				}
				Some(h) if h.is_ascii_hexdigit() || h == '_' => {
					Token::HexTag(lexer.take_while(|c| c.is_ascii_hexdigit() || c == '_'))
				}
				_ => Token::Hash,
			}
		} else if c == '$' {
			lexer.bump();
			Token::BinTag(lexer.take_while(|c| c == '0' || c == '1' || c == '_'))
		} else {
			lexer.bump();
			match c {
				':' => Token::Colon,
				'=' => Token::Equals,
				';' => Token::Semicolon,
				'(' => Token::LParen,
				')' => Token::RParen,
				'^' => Token::Caret,
				'{' | '}' | '[' | ']' | '~' | '?' | '.' | '*' | '+' | '<' | '>' | '!' | ',' | '|' => Token::Other(c),
				other => {
					return Err(SchemaError::Syntax { line, column, message: format!("unexpected character `{}`", other) })
				}
			}
		};
		tokens.push(Spanned { token, line, column });
	}

	Ok(tokens)
}
