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

use serde::{Deserialize, Serialize};

/// Bounds on how much work a decode may do. Both fail closed: once reached, raw cells stay
/// raw and the value built so far is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
	/// How many cell references deep expansion may descend below the root.
	pub max_depth: usize,
	/// How many expansion passes [`crate::Decoder::decode_fully`] runs before giving up on
	/// reaching a fixed point.
	pub max_passes: usize,
	/// How many cell references a whole decode may replace with their decoded form. Cells
	/// shared between several parents count once per occurrence.
	pub max_cells: usize,
}

impl Default for Limits {
	fn default() -> Self {
		Limits { max_depth: 64, max_passes: 32, max_cells: 4096 }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_take_defaults() {
		let limits: Limits = serde_json::from_str(r#"{ "max_passes": 4 }"#).unwrap();
		assert_eq!(limits, Limits { max_passes: 4, ..Limits::default() });
	}
}
