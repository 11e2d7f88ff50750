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

//! The ways a single cell can be decoded. Each strategy either produces a [`Value`] or says
//! why it could not; the [`crate::Cascade`] decides which result wins.

mod blocks;
mod hinted;
mod library;

pub use blocks::BlockLayouts;
pub use hinted::HintedSchema;
pub use library::BundledLibrary;

use crate::error::StrategyError;
use celldec_common::{Cell, Value};
use celldec_tlb::{Schema, SchemaError};
use dyn_clone::DynClone;
use std::{cell::OnceCell, fmt, sync::Arc};

pub trait Strategy: DynClone + fmt::Debug {
	/// A short name used in diagnostics.
	fn name(&self) -> &'static str;

	/// Whether this strategy has anything to try given `hint`. Strategies that don't apply
	/// are skipped silently rather than reported as failures.
	fn applies(&self, _hint: &SchemaHint) -> bool {
		true
	}

	fn decode(&self, cell: &Arc<Cell>, hint: &SchemaHint) -> Result<Value, StrategyError>;
}

/// Schema text supplied by the caller. The text is compiled at most once, the first time a
/// strategy asks for it.
#[derive(Debug, Clone, Default)]
pub struct SchemaHint {
	text: String,
	compiled: OnceCell<Result<Schema, SchemaError>>,
}

impl SchemaHint {
	pub fn new<S: Into<String>>(text: S) -> Self {
		SchemaHint { text: text.into(), compiled: OnceCell::new() }
	}

	/// No hint at all.
	pub fn none() -> Self {
		Self::default()
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// Blank text counts as no hint.
	pub fn is_empty(&self) -> bool {
		self.text.trim().is_empty()
	}

	pub fn schema(&self) -> Result<&Schema, SchemaError> {
		self.compiled.get_or_init(|| Schema::compile(&self.text)).as_ref().map_err(Clone::clone)
	}
}

impl From<&str> for SchemaHint {
	fn from(text: &str) -> Self {
		SchemaHint::new(text)
	}
}

impl From<String> for SchemaHint {
	fn from(text: String) -> Self {
		SchemaHint::new(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_hints_are_empty() {
		assert!(SchemaHint::none().is_empty());
		assert!(SchemaHint::from(" \n\t").is_empty());
		assert!(!SchemaHint::from("a$0 = A;").is_empty());
	}

	#[test]
	fn compilation_result_is_kept() {
		let hint = SchemaHint::from("a$0 x:uint8 = A;");
		let first = hint.schema().unwrap() as *const Schema;
		let second = hint.schema().unwrap() as *const Schema;
		assert_eq!(first, second);
		assert!(SchemaHint::from("a x:Nope = A;").schema().is_err());
	}
}
