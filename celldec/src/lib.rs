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

//! Decode TON cells without knowing in advance which schema applies.
//!
//! A [`Decoder`] tries a [`Cascade`] of strategies on a cell: the caller's schema hint, then
//! a bundled library of well-known schemas, then heuristic block layouts. Whatever the
//! winning strategy produces may itself contain cell references, so the decoder keeps
//! expanding those until nothing changes.
//!
//! ```no_run
//! use celldec::{Decoder, SchemaHint};
//!
//! # fn main() -> Result<(), celldec::Error> {
//! let decoder = Decoder::new()?;
//! let decoded = decoder.decode_input("te6cckEBAQEACAAADAAAAABoaeh7Muk=", &SchemaHint::none())?;
//! println!("{}", celldec::sanitize(&decoded.value));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod cascade;
mod config;
pub mod diagnostics;
mod error;
mod expand;
mod input;
mod sanitize;
pub mod strategy;

pub use cascade::Cascade;
pub use celldec_common::{Cell, Value};
pub use config::Limits;
pub use diagnostics::{Diagnostics, Event, LogDiagnostics, Recorder};
pub use error::{Error, StrategyError};
pub use expand::Expansion;
pub use input::parse_input;
pub use sanitize::{sanitize, sanitize_json, MAX_SAFE_INTEGER};
pub use strategy::{SchemaHint, Strategy};

use expand::Expander;
use std::{borrow::Cow, sync::Arc};

/// Decodes cells with a [`Cascade`] of strategies, within a set of [`Limits`].
#[derive(Debug, Clone)]
pub struct Decoder {
	cascade: Cascade,
	limits: Limits,
	diagnostics: Arc<dyn Diagnostics>,
}

/// A decoded input: the root cell and the fully expanded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
	pub root: Arc<Cell>,
	pub value: Value,
}

impl Decoded {
	/// Whether any strategy decoded the root.
	pub fn is_decoded(&self) -> bool {
		!matches!(&self.value, Value::Cell(cell) if *cell == self.root)
	}

	pub fn sanitized(&self) -> serde_json::Value {
		sanitize(&self.value)
	}
}

impl Decoder {
	/// A decoder with the standard cascade, default limits, and diagnostics sent to `log`.
	pub fn new() -> Result<Self, Error> {
		Ok(Self::with_cascade(Cascade::standard()?))
	}

	/// A decoder trying `cascade` instead of the standard strategies.
	pub fn with_cascade(cascade: Cascade) -> Self {
		Self { cascade, limits: Limits::default(), diagnostics: Arc::new(LogDiagnostics) }
	}

	/// Replace the default [`Limits`].
	pub fn with_limits(mut self, limits: Limits) -> Self {
		self.limits = limits;
		self
	}

	/// Report absorbed failures to `diagnostics` instead of the `log` crate.
	pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
		self.diagnostics = Arc::new(diagnostics);
		self
	}

	pub fn cascade(&self) -> &Cascade {
		&self.cascade
	}

	pub fn limits(&self) -> &Limits {
		&self.limits
	}

	/// Decode a single cell, without expanding what it references.
	pub fn decode(&self, cell: &Arc<Cell>, hint: &SchemaHint) -> Option<Value> {
		self.cascade.decode(cell, hint, &*self.diagnostics)
	}

	/// One expansion pass over `value`.
	pub fn expand<'v>(&self, value: &'v Value, hint: &SchemaHint) -> Expansion<'v> {
		self.expander(hint).pass(value, &mut Vec::new())
	}

	/// Decode `cell` and expand the result until a pass changes nothing or the pass limit is
	/// reached. A cell no strategy decodes comes back as [`Value::Cell`].
	pub fn decode_fully(&self, cell: &Arc<Cell>, hint: &SchemaHint) -> Value {
		let mut current = match self.decode(cell, hint) {
			Some(value) => value,
			None => return Value::Cell(cell.clone()),
		};

		let mut expander = self.expander(hint);
		let mut ancestors = vec![*cell.hash()];
		for pass in 0..self.limits.max_passes {
			let next = match expander.pass(&current, &mut ancestors).into_value() {
				Cow::Borrowed(_) => None,
				Cow::Owned(next) => Some(next),
			};
			match next {
				Some(next) => current = next,
				None => {
					log::debug!("fixed point reached after {} passes", pass);
					return current;
				}
			}
		}

		if expander.pass(&current, &mut ancestors).has_changes() {
			self.diagnostics.report(Event::PassLimit { passes: self.limits.max_passes });
		}
		current
	}

	/// Read `input` as a base64 or hex bag of cells and fully decode its first root.
	pub fn decode_input(&self, input: &str, hint: &SchemaHint) -> Result<Decoded, Error> {
		let root = parse_input(input)?;
		let value = self.decode_fully(&root, hint);
		Ok(Decoded { root, value })
	}

	fn expander<'d>(&'d self, hint: &'d SchemaHint) -> Expander<'d> {
		Expander::new(&self.cascade, hint, &self.limits, &*self.diagnostics)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use celldec_common::CellBuilder;

	fn comment_cell(text: &str) -> Arc<Cell> {
		CellBuilder::new().store_uint(0, 32).unwrap().store_bytes(text.as_bytes()).unwrap().build().unwrap()
	}

	#[test]
	fn nested_references_are_expanded_to_a_fixed_point() {
		let _ = pretty_env_logger::try_init();
		// a hinted wrapper around a wrapper around a comment
		let hint = SchemaHint::from("wrap#77 inner:^Cell = Wrap;");
		let wrap = |child: Arc<Cell>| CellBuilder::new().store_uint(0x77, 8).unwrap().store_ref(child).unwrap().build().unwrap();
		let root = wrap(wrap(comment_cell("deep")));

		let decoder = Decoder::new().unwrap();
		let value = decoder.decode_fully(&root, &hint);
		assert!(!decoder.expand(&value, &hint).has_changes());

		let inner = value.field("inner").unwrap();
		let Value::Expanded(inner) = inner else { panic!("expected expansion, got {:?}", inner) };
		let Value::Expanded(innermost) = inner.parsed.field("inner").unwrap() else { panic!("expected expansion") };
		assert_eq!(innermost.parsed, Value::Comment("deep".into()));
		assert!(!value.has_raw_cells());
	}

	#[test]
	fn undecodable_root_stays_raw() {
		let cell = CellBuilder::new().store_uint(0b1, 1).unwrap().build().unwrap();
		let decoder = Decoder::new().unwrap();
		assert_eq!(decoder.decode_fully(&cell, &SchemaHint::none()), Value::Cell(cell));
	}

	#[test]
	fn pass_limit_is_reported() {
		let hint = SchemaHint::from("wrap#77 inner:^Cell = Wrap;");
		let wrap = |child: Arc<Cell>| CellBuilder::new().store_uint(0x77, 8).unwrap().store_ref(child).unwrap().build().unwrap();
		let root = wrap(wrap(wrap(comment_cell("deep"))));

		let recorder = Recorder::new();
		let decoder = Decoder::new()
			.unwrap()
			.with_limits(Limits { max_passes: 1, ..Limits::default() })
			.with_diagnostics(recorder.clone());
		let value = decoder.decode_fully(&root, &hint);
		assert!(value.has_raw_cells());
		assert!(recorder.events().contains(&Event::PassLimit { passes: 1 }));
	}

	#[test]
	fn self_similar_cells_terminate() {
		// `Cell` takes the rest of the slice, which here is the whole cell again
		let hint = SchemaHint::from("_ rest:Cell = Echo;");
		let root = comment_cell("echo");
		let recorder = Recorder::new();
		let decoder = Decoder::new().unwrap().with_diagnostics(recorder.clone());
		let value = decoder.decode_fully(&root, &hint);
		assert_eq!(value.field("rest"), Some(&Value::Cell(root)));
		assert!(matches!(recorder.events().as_slice(), [.., Event::CycleDetected { .. }]));
	}
}
