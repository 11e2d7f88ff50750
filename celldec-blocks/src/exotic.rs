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

use crate::{error::BlockError, parts::Reader};
use celldec_common::{Cell, Value};

pub const PRUNED_BRANCH: u8 = 1;
pub const LIBRARY_REFERENCE: u8 = 2;
pub const MERKLE_PROOF: u8 = 3;
pub const MERKLE_UPDATE: u8 = 4;

const HASH_BITS: usize = 256;

pub(crate) fn decode(cell: &Cell, ty: u8) -> Result<Value, BlockError> {
	match ty {
		PRUNED_BRANCH => pruned_branch(cell),
		LIBRARY_REFERENCE => {
			let mut reader = Reader::new("library_reference", cell);
			reader.tag(LIBRARY_REFERENCE as u128, 8)?;
			reader.bits("hash", HASH_BITS)?;
			reader.finish()
		}
		MERKLE_PROOF => {
			let mut reader = Reader::new("merkle_proof", cell);
			reader.tag(MERKLE_PROOF as u128, 8)?;
			reader.bits("virtual_hash", HASH_BITS)?;
			reader.uint("depth", 16)?;
			reader.reference("virtual_root")?;
			reader.finish()
		}
		MERKLE_UPDATE => {
			let mut reader = Reader::new("merkle_update", cell);
			reader.tag(MERKLE_UPDATE as u128, 8)?;
			reader.bits("old_hash", HASH_BITS)?;
			reader.bits("new_hash", HASH_BITS)?;
			reader.uint("old_depth", 16)?;
			reader.uint("new_depth", 16)?;
			reader.reference("old")?;
			reader.reference("new")?;
			reader.finish()
		}
		other => Err(BlockError::UnknownExotic(other)),
	}
}

/// A pruned branch keeps one hash and one depth per level set in its mask.
fn pruned_branch(cell: &Cell) -> Result<Value, BlockError> {
	let mut reader = Reader::new("pruned_branch", cell);
	reader.tag(PRUNED_BRANCH as u128, 8)?;
	let mask = reader.uint("level_mask", 8)?;
	let levels = mask.count_ones() as usize;

	let slice = reader.slice();
	let mut hashes = Vec::with_capacity(levels);
	for _ in 0..levels {
		hashes.push(Value::Bits(slice.load_bits(HASH_BITS)?));
	}
	let mut depths = Vec::with_capacity(levels);
	for _ in 0..levels {
		depths.push(Value::u64(slice.load_uint(16)? as u64));
	}
	reader.push("hashes", Value::List(hashes));
	reader.push("depths", Value::List(depths));
	reader.finish()
}
