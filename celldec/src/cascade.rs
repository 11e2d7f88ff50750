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

use crate::{
	diagnostics::{Diagnostics, Event},
	strategy::{BlockLayouts, BundledLibrary, HintedSchema, SchemaHint, Strategy},
};
use celldec_common::{Cell, Value};
use celldec_tlb::SchemaError;
use std::sync::Arc;

/// An ordered list of strategies. The first one that decodes a cell wins.
#[derive(Debug)]
pub struct Cascade {
	strategies: Vec<Box<dyn Strategy>>,
}

impl Clone for Cascade {
	fn clone(&self) -> Self {
		Self { strategies: self.strategies.iter().map(|s| dyn_clone::clone_box(&**s)).collect() }
	}
}

impl Cascade {
	/// The hint first, then the bundled library, then block layouts.
	pub fn standard() -> Result<Self, SchemaError> {
		Ok(Self::new(vec![Box::new(HintedSchema), Box::new(BundledLibrary::new()?), Box::new(BlockLayouts)]))
	}

	pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
		Self { strategies }
	}

	/// Add a strategy after the existing ones.
	pub fn push(&mut self, strategy: impl Strategy + 'static) {
		self.strategies.push(Box::new(strategy));
	}

	pub fn strategies(&self) -> impl Iterator<Item = &dyn Strategy> {
		self.strategies.iter().map(|s| &**s)
	}

	/// Decode `cell` with the first strategy that succeeds. Failures are reported to
	/// `diagnostics` and never abort the cascade; `None` means the cell stays raw.
	pub fn decode(&self, cell: &Arc<Cell>, hint: &SchemaHint, diagnostics: &dyn Diagnostics) -> Option<Value> {
		for strategy in &self.strategies {
			if !strategy.applies(hint) {
				log::trace!("skipping `{}`", strategy.name());
				continue;
			}
			match strategy.decode(cell, hint) {
				Ok(value) => {
					log::debug!("`{}` decoded cell {}", strategy.name(), cell.hash_hex());
					return Some(value);
				}
				Err(e) => diagnostics.report(Event::StrategyFailed {
					strategy: strategy.name(),
					cell: cell.hash_hex(),
					error: e.to_string(),
				}),
			}
		}
		None
	}
}
