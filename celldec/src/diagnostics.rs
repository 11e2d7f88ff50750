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
Failures the decoder absorbs are not errors to the caller, but they are still worth knowing
about. Every such failure is reported as an [`Event`] to a [`Diagnostics`] implementation.
[`LogDiagnostics`] forwards events to the `log` facade and is what a [`crate::Decoder`] uses
unless told otherwise; [`Recorder`] keeps them for later inspection.
*/

use std::{
	fmt,
	sync::{Arc, Mutex},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	/// A strategy could not decode a cell; the cascade moved on.
	StrategyFailed { strategy: &'static str, cell: String, error: String },
	/// A cell was left raw because it sits deeper than the configured limit.
	DepthLimit { cell: String, depth: usize },
	/// A cell was left raw because it already occurs among its own ancestors.
	CycleDetected { cell: String },
	/// A cell was left raw because the decode already expanded as many cells as allowed.
	BudgetExhausted { cell: String, budget: usize },
	/// Expansion was still changing the value after the configured number of passes.
	PassLimit { passes: usize },
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Event::StrategyFailed { strategy, cell, error } => {
				write!(f, "strategy `{}` failed on cell {}: {}", strategy, cell, error)
			}
			Event::DepthLimit { cell, depth } => write!(f, "cell {} is {} references deep, not expanding", cell, depth),
			Event::CycleDetected { cell } => write!(f, "cell {} references itself, not expanding", cell),
			Event::BudgetExhausted { cell, budget } => {
				write!(f, "cell {} left raw, {} cells already expanded", cell, budget)
			}
			Event::PassLimit { passes } => write!(f, "no fixed point after {} passes", passes),
		}
	}
}

pub trait Diagnostics: fmt::Debug + Send + Sync {
	fn report(&self, event: Event);
}

/// Report events through the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
	fn report(&self, event: Event) {
		match event {
			Event::StrategyFailed { .. } => log::debug!("{}", event),
			_ => log::warn!("{}", event),
		}
	}
}

/// Collects events in memory. Clones share the same collection.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
	events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Everything reported so far, oldest first.
	pub fn events(&self) -> Vec<Event> {
		self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
	}

	pub fn clear(&self) {
		self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
	}
}

impl Diagnostics for Recorder {
	fn report(&self, event: Event) {
		log::trace!("recorded: {}", event);
		self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(event);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recorder_clones_share_events() {
		let recorder = Recorder::new();
		let handle = recorder.clone();
		handle.report(Event::PassLimit { passes: 3 });
		assert_eq!(recorder.events(), vec![Event::PassLimit { passes: 3 }]);
		recorder.clear();
		assert!(handle.events().is_empty());
	}
}
