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

//! Shard states.
//!
//! ```text
//! shard_state#9023afe2 global_id:int32 shard_id:ShardIdent seq_no:uint32 vert_seq_no:#
//!   gen_utime:uint32 gen_lt:uint64 min_ref_mc_seqno:uint32 out_msg_queue_info:^OutMsgQueueInfo
//!   before_split:(## 1) accounts:^ShardAccounts ^[ ... ] custom:(Maybe ^McStateExtra) = ShardStateUnsplit;
//! split_state#5f327da5 left:^ShardStateUnsplit right:^ShardStateUnsplit = ShardState;
//! ```

use crate::{error::BlockError, parts::Reader};
use celldec_common::{Cell, Value};

pub const SHARD_STATE: u32 = 0x9023afe2;
pub const SPLIT_STATE: u32 = 0x5f327da5;

pub(crate) fn shard_state(cell: &Cell) -> Result<Value, BlockError> {
	let mut reader = Reader::new("shard_state", cell);
	reader.tag(SHARD_STATE as u128, 32)?;
	reader.int("global_id", 32)?;
	reader.shard_ident("shard_id")?;
	reader.uint("seq_no", 32)?;
	reader.uint("vert_seq_no", 32)?;
	reader.uint("gen_utime", 32)?;
	reader.uint("gen_lt", 64)?;
	reader.uint("min_ref_mc_seqno", 32)?;
	reader.reference("out_msg_queue_info")?;
	reader.flag("before_split")?;
	reader.reference("accounts")?;
	reader.reference("extra")?;
	reader.maybe_reference("custom")?;
	reader.finish()
}

pub(crate) fn split_state(cell: &Cell) -> Result<Value, BlockError> {
	let mut reader = Reader::new("split_state", cell);
	reader.tag(SPLIT_STATE as u128, 32)?;
	reader.reference("left")?;
	reader.reference("right")?;
	reader.finish()
}

#[cfg(test)]
mod tests {
	use super::*;
	use celldec_common::CellBuilder;
	use std::sync::Arc;

	#[test]
	fn split_state_needs_both_halves() {
		let half = Arc::new(Cell::empty());
		let mut builder = CellBuilder::new();
		builder.store_uint(SPLIT_STATE as u128, 32).unwrap().store_ref(half.clone()).unwrap();
		let one = builder.build().unwrap();
		assert!(matches!(split_state(&one), Err(BlockError::Slice(_))));

		builder.store_ref(half.clone()).unwrap();
		let both = builder.build().unwrap();
		let value = split_state(&both).unwrap();
		assert_eq!(value.field("right"), Some(&Value::Cell(half)));
	}

	#[test]
	fn shard_state_header() {
		let child = Arc::new(Cell::empty());
		let mut builder = CellBuilder::new();
		builder.store_uint(SHARD_STATE as u128, 32).unwrap().store_int(-239, 32).unwrap();
		builder.store_uint(0, 2).unwrap().store_uint(0, 6).unwrap().store_int(-1, 32).unwrap().store_uint(1 << 63, 64).unwrap();
		builder.store_uint(5, 32).unwrap().store_uint(0, 32).unwrap().store_uint(1_700_000_000, 32).unwrap();
		builder.store_uint(42, 64).unwrap().store_uint(4, 32).unwrap();
		builder.store_ref(child.clone()).unwrap().store_bit(false).unwrap().store_ref(child.clone()).unwrap();
		builder.store_ref(child.clone()).unwrap().store_bit(false).unwrap();
		let cell = builder.build().unwrap();

		let value = shard_state(&cell).unwrap();
		assert_eq!(value.kind(), Some("shard_state"));
		assert_eq!(value.field("gen_lt"), Some(&Value::u64(42)));
		assert_eq!(value.field("shard_id").and_then(|s| s.field("workchain_id")), Some(&Value::i64(-1)));
		assert_eq!(value.field("custom"), Some(&Value::null()));
	}
}
