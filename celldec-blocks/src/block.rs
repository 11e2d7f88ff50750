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

//! Block headers.
//!
//! ```text
//! block#11ef55aa global_id:int32 info:^BlockInfo value_flow:^ValueFlow
//!   state_update:^(MERKLE_UPDATE ShardState) extra:^BlockExtra = Block;
//! block_extra#4a33f6fd in_msg_descr:^InMsgDescr out_msg_descr:^OutMsgDescr
//!   account_blocks:^ShardAccountBlocks rand_seed:bits256 created_by:bits256
//!   custom:(Maybe ^McBlockExtra) = BlockExtra;
//! ```

use crate::{error::BlockError, parts::Reader};
use celldec_common::{Cell, Value};

pub const BLOCK: u32 = 0x11ef55aa;
pub const BLOCK_INFO: u32 = 0x9bc7a987;
pub const BLOCK_EXTRA: u32 = 0x4a33f6fd;
pub const VALUE_FLOW: u32 = 0xb8e48dfb;
pub const VALUE_FLOW_V2: u32 = 0x3ebf98b7;

const GLOBAL_VERSION: u128 = 0xc4;

pub(crate) fn block(cell: &Cell) -> Result<Value, BlockError> {
	let mut reader = Reader::new("block", cell);
	reader.tag(BLOCK as u128, 32)?;
	reader.int("global_id", 32)?;
	reader.reference("info")?;
	reader.reference("value_flow")?;
	reader.reference("state_update")?;
	reader.reference("extra")?;
	reader.finish()
}

pub(crate) fn block_info(cell: &Cell) -> Result<Value, BlockError> {
	let mut reader = Reader::new("block_info", cell);
	reader.tag(BLOCK_INFO as u128, 32)?;
	reader.uint("version", 32)?;
	let not_master = reader.flag("not_master")?;
	reader.flag("after_merge")?;
	reader.flag("before_split")?;
	reader.flag("after_split")?;
	reader.flag("want_split")?;
	reader.flag("want_merge")?;
	reader.flag("key_block")?;
	let vert_seqno_incr = reader.flag("vert_seqno_incr")?;
	let flags = reader.uint("flags", 8)?;
	reader.uint("seq_no", 32)?;
	reader.uint("vert_seq_no", 32)?;
	reader.shard_ident("shard")?;
	reader.uint("gen_utime", 32)?;
	reader.uint("start_lt", 64)?;
	reader.uint("end_lt", 64)?;
	reader.uint("gen_validator_list_hash_short", 32)?;
	reader.uint("gen_catchain_seqno", 32)?;
	reader.uint("min_ref_mc_seqno", 32)?;
	reader.uint("prev_key_block_seqno", 32)?;

	if flags & 1 == 1 {
		let slice = reader.slice();
		let tag = slice.load_uint(8)?;
		if tag != GLOBAL_VERSION {
			return Err(BlockError::InvalidTag { layout: "global_version", found: tag });
		}
		let version = slice.load_uint(32)? as u64;
		let capabilities = slice.load_uint(64)? as u64;
		reader.push(
			"gen_software",
			Value::structured(
				"capabilities",
				vec![("version".into(), Value::u64(version)), ("capabilities".into(), Value::u64(capabilities))],
			),
		);
	}
	if not_master {
		reader.reference("master_ref")?;
	}
	reader.reference("prev_ref")?;
	if vert_seqno_incr {
		reader.reference("prev_vert_ref")?;
	}
	reader.finish()
}

pub(crate) fn block_extra(cell: &Cell) -> Result<Value, BlockError> {
	let mut reader = Reader::new("block_extra", cell);
	reader.tag(BLOCK_EXTRA as u128, 32)?;
	reader.reference("in_msg_descr")?;
	reader.reference("out_msg_descr")?;
	reader.reference("account_blocks")?;
	reader.bits("rand_seed", 256)?;
	reader.bits("created_by", 256)?;
	reader.maybe_reference("custom")?;
	reader.finish()
}

/// Both versions of the value flow: the second adds `burned` after `fees_collected`.
pub(crate) fn value_flow(cell: &Cell, tag: u32) -> Result<Value, BlockError> {
	let mut reader = Reader::new("value_flow", cell);
	reader.tag(tag as u128, 32)?;
	reader.nested("flow", "value_flow_in", |flow| {
		flow.currencies("from_prev_blk")?;
		flow.currencies("to_next_blk")?;
		flow.currencies("imported")?;
		flow.currencies("exported")
	})?;
	reader.currencies("fees_collected")?;
	if tag == VALUE_FLOW_V2 {
		reader.currencies("burned")?;
	}
	reader.nested("fees", "value_flow_fees", |fees| {
		fees.currencies("fees_imported")?;
		fees.currencies("recovered")?;
		fees.currencies("created")?;
		fees.currencies("minted")
	})?;
	reader.finish()
}
