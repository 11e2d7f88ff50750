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

use super::{SchemaHint, Strategy};
use crate::error::StrategyError;
use celldec_common::{Cell, Value};
use std::sync::Arc;

/// Match against known block layouts, ignoring any hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLayouts;

impl Strategy for BlockLayouts {
	fn name(&self) -> &'static str {
		"block_layouts"
	}

	fn decode(&self, cell: &Arc<Cell>, _hint: &SchemaHint) -> Result<Value, StrategyError> {
		Ok(celldec_blocks::decode_block_layout(cell)?)
	}
}
