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
One expansion pass: walk a [`Value`], hand every raw cell reference to the [`Cascade`], and
splice in what it decodes to.

A pass borrows its input and only allocates along the paths that actually changed, so an
[`Expansion`] without changes is the input itself. Decoded cells are not expanded further
within the same pass; repeated passes reach them.

An [`Expander`] remembers what every cell decoded to, so a cell referenced from many places
goes through the cascade once. It also counts the cells it replaced across all of its
passes and stops at [`Limits::max_cells`]: a small bag of cells can reference one child
from both sides of every fork, which doubles the decoded tree at each level.
*/

use crate::{
	cascade::Cascade,
	config::Limits,
	diagnostics::{Diagnostics, Event},
	strategy::SchemaHint,
};
use celldec_common::{Cell, CellHash, ExpandedCell, Structured, Value};
use std::{borrow::Cow, collections::HashMap, sync::Arc};

/// The outcome of one expansion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion<'a> {
	value: Cow<'a, Value>,
}

impl<'a> Expansion<'a> {
	fn unchanged(value: &'a Value) -> Self {
		Expansion { value: Cow::Borrowed(value) }
	}

	fn changed(value: Value) -> Self {
		Expansion { value: Cow::Owned(value) }
	}

	/// Did the pass change anything? If not, [`Expansion::value`] is the input.
	pub fn has_changes(&self) -> bool {
		matches!(self.value, Cow::Owned(_))
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	pub fn into_value(self) -> Cow<'a, Value> {
		self.value
	}
}

pub(crate) struct Expander<'d> {
	cascade: &'d Cascade,
	hint: &'d SchemaHint,
	limits: &'d Limits,
	diagnostics: &'d dyn Diagnostics,
	decoded: HashMap<CellHash, Option<Value>>,
	expanded: usize,
	exhausted: bool,
}

impl<'d> Expander<'d> {
	pub fn new(cascade: &'d Cascade, hint: &'d SchemaHint, limits: &'d Limits, diagnostics: &'d dyn Diagnostics) -> Self {
		Expander { cascade, hint, limits, diagnostics, decoded: HashMap::new(), expanded: 0, exhausted: false }
	}

	/// How many cell references this expander has replaced so far.
	pub fn expanded(&self) -> usize {
		self.expanded
	}

	/// Run one pass over `value`. `ancestors` holds the hashes of the cells `value` was
	/// decoded from, outermost first.
	pub fn pass<'v>(&mut self, value: &'v Value, ancestors: &mut Vec<CellHash>) -> Expansion<'v> {
		match value {
			Value::Primitive(_) | Value::Bits(_) | Value::Address(_) | Value::Comment(_) | Value::Assembler(_) => {
				Expansion::unchanged(value)
			}
			Value::Dictionary(dict) => {
				let entries = dict
					.flatten()
					.into_iter()
					.map(|(key, entry)| {
						let expanded = self.pass(&entry, ancestors).into_value().into_owned();
						(key, expanded)
					})
					.collect();
				Expansion::changed(Value::Entries(entries))
			}
			Value::Cell(cell) => self.cell(value, cell, ancestors),
			Value::List(items) => match self.items(items, ancestors) {
				Some(items) => Expansion::changed(Value::List(items)),
				None => Expansion::unchanged(value),
			},
			Value::Structured(s) => match self.fields(&s.fields, ancestors) {
				Some(fields) => Expansion::changed(Value::Structured(Structured { kind: s.kind.clone(), fields })),
				None => Expansion::unchanged(value),
			},
			Value::Entries(entries) => match self.fields(entries, ancestors) {
				Some(entries) => Expansion::changed(Value::Entries(entries)),
				None => Expansion::unchanged(value),
			},
			Value::Expanded(expanded) => {
				ancestors.push(*expanded.cell.hash());
				let parsed = self.pass(&expanded.parsed, ancestors);
				ancestors.pop();
				match parsed.into_value() {
					Cow::Borrowed(_) => Expansion::unchanged(value),
					Cow::Owned(parsed) => Expansion::changed(Value::Expanded(Box::new(ExpandedCell {
						cell: expanded.cell.clone(),
						data: expanded.data.clone(),
						parsed,
					}))),
				}
			}
		}
	}

	fn cell<'v>(&mut self, value: &'v Value, cell: &Arc<Cell>, ancestors: &[CellHash]) -> Expansion<'v> {
		if ancestors.contains(cell.hash()) {
			self.diagnostics.report(Event::CycleDetected { cell: cell.hash_hex() });
			return Expansion::unchanged(value);
		}
		if ancestors.len() >= self.limits.max_depth {
			self.diagnostics.report(Event::DepthLimit { cell: cell.hash_hex(), depth: ancestors.len() });
			return Expansion::unchanged(value);
		}
		if self.expanded >= self.limits.max_cells {
			if !self.exhausted {
				self.exhausted = true;
				self.diagnostics.report(Event::BudgetExhausted { cell: cell.hash_hex(), budget: self.limits.max_cells });
			}
			return Expansion::unchanged(value);
		}

		let (cascade, hint, diagnostics) = (self.cascade, self.hint, self.diagnostics);
		let parsed = self.decoded.entry(*cell.hash()).or_insert_with(|| cascade.decode(cell, hint, diagnostics));
		match parsed {
			Some(parsed) => {
				let parsed = parsed.clone();
				self.expanded += 1;
				Expansion::changed(Value::Expanded(Box::new(ExpandedCell::new(cell.clone(), parsed))))
			}
			None => Expansion::unchanged(value),
		}
	}

	/// `None` when no item changed.
	fn items(&mut self, items: &[Value], ancestors: &mut Vec<CellHash>) -> Option<Vec<Value>> {
		let mut out: Option<Vec<Value>> = None;
		for (i, item) in items.iter().enumerate() {
			match self.pass(item, ancestors).into_value() {
				Cow::Owned(new) => out.get_or_insert_with(|| items[..i].to_vec()).push(new),
				Cow::Borrowed(old) => {
					if let Some(out) = out.as_mut() {
						out.push(old.clone());
					}
				}
			}
		}
		out
	}

	/// `None` when no field changed.
	fn fields(&mut self, fields: &[(String, Value)], ancestors: &mut Vec<CellHash>) -> Option<Vec<(String, Value)>> {
		let mut out: Option<Vec<(String, Value)>> = None;
		for (i, (name, field)) in fields.iter().enumerate() {
			match self.pass(field, ancestors).into_value() {
				Cow::Owned(new) => out.get_or_insert_with(|| fields[..i].to_vec()).push((name.clone(), new)),
				Cow::Borrowed(old) => {
					if let Some(out) = out.as_mut() {
						out.push((name.clone(), old.clone()));
					}
				}
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::diagnostics::Recorder;
	use celldec_common::{bits, CellBuilder, Dictionary};

	fn comment(text: &str) -> Arc<Cell> {
		CellBuilder::new().store_uint(0, 32).unwrap().store_bytes(text.as_bytes()).unwrap().build().unwrap()
	}

	fn run<'v>(value: &'v Value, recorder: &Recorder, limits: Limits) -> Expansion<'v> {
		let cascade = Cascade::standard().unwrap();
		let hint = SchemaHint::none();
		Expander::new(&cascade, &hint, &limits, recorder).pass(value, &mut Vec::new())
	}

	#[test]
	fn unchanged_values_are_returned_as_is() {
		let value = Value::structured(
			"outer",
			vec![("list".into(), Value::List(vec![Value::u64(1), Value::string("x")])), ("n".into(), Value::null())],
		);
		let expansion = run(&value, &Recorder::new(), Limits::default());
		assert!(!expansion.has_changes());
		assert!(std::ptr::eq(expansion.value(), &value));
	}

	#[test]
	fn cells_are_replaced_in_place() {
		let cell = comment("hey");
		let value = Value::List(vec![Value::u64(1), Value::Cell(cell.clone()), Value::u64(3)]);
		let expansion = run(&value, &Recorder::new(), Limits::default());
		assert!(expansion.has_changes());
		match expansion.value() {
			Value::List(items) => {
				assert_eq!(items[0], Value::u64(1));
				assert_eq!(items[2], Value::u64(3));
				match &items[1] {
					Value::Expanded(expanded) => {
						assert_eq!(expanded.parsed, Value::Comment("hey".into()));
						assert_eq!(expanded.data, cell.to_boc_hex());
					}
					other => panic!("expected an expanded cell, got {:?}", other),
				}
			}
			other => panic!("expected a list, got {:?}", other),
		}
	}

	#[test]
	fn undecodable_cells_stay_raw() {
		let cell = CellBuilder::new().store_uint(0b101, 3).unwrap().build().unwrap();
		let value = Value::structured("s", vec![("raw".into(), Value::Cell(cell))]);
		let recorder = Recorder::new();
		let expansion = run(&value, &recorder, Limits::default());
		assert!(!expansion.has_changes());
		assert!(std::ptr::eq(expansion.value(), &value));
		assert!(!recorder.events().is_empty());
	}

	#[test]
	fn dictionaries_always_flatten() {
		let dict = Dictionary::new(8, vec![(bits::from_bytes(&[5], 8), Value::u64(50))]);
		let value = Value::Dictionary(dict);
		let expansion = run(&value, &Recorder::new(), Limits::default());
		assert!(expansion.has_changes());
		assert_eq!(expansion.value(), &Value::Entries(vec![("5".into(), Value::u64(50))]));
	}

	#[test]
	fn depth_limit_keeps_cells_raw() {
		let value = Value::Cell(comment("deep"));
		let recorder = Recorder::new();
		let expansion = run(&value, &recorder, Limits { max_depth: 0, ..Limits::default() });
		assert!(!expansion.has_changes());
		assert!(matches!(recorder.events().as_slice(), [Event::DepthLimit { depth: 0, .. }]));
	}

	#[test]
	fn ancestors_are_not_expanded_again() {
		let cell = comment("loop");
		let value = Value::Expanded(Box::new(ExpandedCell::new(cell.clone(), Value::Cell(cell))));
		let recorder = Recorder::new();
		let expansion = run(&value, &recorder, Limits::default());
		assert!(!expansion.has_changes());
		assert!(matches!(recorder.events().as_slice(), [Event::CycleDetected { .. }]));
	}

	#[derive(Debug, Clone, Default)]
	struct Counting(Arc<std::sync::atomic::AtomicUsize>);

	impl crate::Strategy for Counting {
		fn name(&self) -> &'static str {
			"counting"
		}

		fn decode(&self, _cell: &Arc<Cell>, _hint: &SchemaHint) -> Result<Value, crate::StrategyError> {
			self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
			Ok(Value::null())
		}
	}

	#[test]
	fn shared_cells_go_through_the_cascade_once() {
		let counting = Counting::default();
		let cascade = Cascade::new(vec![Box::new(counting.clone())]);
		let (hint, limits, recorder) = (SchemaHint::none(), Limits::default(), Recorder::new());
		let cell = comment("shared");
		let value = Value::List(vec![Value::Cell(cell.clone()); 4]);

		let mut expander = Expander::new(&cascade, &hint, &limits, &recorder);
		let expansion = expander.pass(&value, &mut Vec::new());
		assert!(expansion.has_changes());
		assert_eq!(expander.expanded(), 4);
		assert_eq!(counting.0.load(std::sync::atomic::Ordering::SeqCst), 1);
	}

	#[test]
	fn cell_budget_keeps_the_rest_raw() {
		let cell = comment("shared");
		let value = Value::List(vec![Value::Cell(cell.clone()); 5]);
		let recorder = Recorder::new();
		let expansion = run(&value, &recorder, Limits { max_cells: 3, ..Limits::default() });
		let Value::List(items) = expansion.value() else { panic!("expected a list") };
		assert_eq!(items.iter().filter(|item| matches!(item, Value::Expanded(_))).count(), 3);
		assert_eq!(items[3], Value::Cell(cell.clone()));
		assert_eq!(recorder.events(), vec![Event::BudgetExhausted { cell: cell.hash_hex(), budget: 3 }]);
	}
}
