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

//! Best-effort recognition of block-level structures: block headers, shard states and exotic
//! cells. Known header fields are decoded; child references are left as raw cells so that a
//! caller can keep decoding them.

#![forbid(unsafe_code)]

mod block;
mod error;
mod exotic;
mod parts;
mod state;

pub use block::{BLOCK, BLOCK_EXTRA, BLOCK_INFO, VALUE_FLOW, VALUE_FLOW_V2};
pub use error::BlockError;
pub use exotic::{LIBRARY_REFERENCE, MERKLE_PROOF, MERKLE_UPDATE, PRUNED_BRANCH};
pub use state::{SHARD_STATE, SPLIT_STATE};

use celldec_common::{Cell, Value};

/// Match `cell` against the known block layouts.
pub fn decode_block_layout(cell: &Cell) -> Result<Value, BlockError> {
	if let Some(ty) = cell.exotic_type() {
		log::trace!("exotic cell of type {}", ty);
		return exotic::decode(cell, ty);
	}

	let tag = cell.parse().preload_uint(32).map_err(|_| BlockError::TooShort(cell.bit_len()))? as u32;
	match tag {
		BLOCK => block::block(cell),
		BLOCK_INFO => block::block_info(cell),
		BLOCK_EXTRA => block::block_extra(cell),
		VALUE_FLOW | VALUE_FLOW_V2 => block::value_flow(cell, tag),
		SHARD_STATE => state::shard_state(cell),
		SPLIT_STATE => state::split_state(cell),
		other => Err(BlockError::UnknownTag(other)),
	}
}
