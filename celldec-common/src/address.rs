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

//! Message addresses (`MsgAddress` in the block layout schema).

use crate::{
	bits::{self, BitString},
	builder::CellBuilder,
	cell::CellError,
	slice::{CellSlice, SliceError},
};
use std::fmt;

/// A message address, as found in message headers and most contract payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MsgAddress {
	/// `addr_none$00`
	None,
	/// `addr_extern$01 len:(## 9) external_address:(bits len)`
	External(BitString),
	/// `addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256`
	Std { anycast: Option<BitString>, workchain: i8, hash: [u8; 32] },
	/// `addr_var$11 anycast:(Maybe Anycast) addr_len:(## 9) workchain_id:int32 address:(bits addr_len)`
	Var { anycast: Option<BitString>, workchain: i32, address: BitString },
}

impl MsgAddress {
	/// A standard internal address without anycast.
	pub fn std(workchain: i8, hash: [u8; 32]) -> Self {
		MsgAddress::Std { anycast: None, workchain, hash }
	}

	pub fn is_none(&self) -> bool {
		matches!(self, MsgAddress::None)
	}

	pub fn load(slice: &mut CellSlice<'_>) -> Result<Self, SliceError> {
		let mut s = *slice;
		let address = match s.load_uint(2)? {
			0b00 => MsgAddress::None,
			0b01 => {
				let len = s.load_uint(9)? as usize;
				MsgAddress::External(s.load_bits(len)?)
			}
			0b10 => {
				let anycast = load_anycast(&mut s)?;
				let workchain = s.load_int(8)? as i8;
				let mut hash = [0u8; 32];
				hash.copy_from_slice(&s.load_bytes(32)?);
				MsgAddress::Std { anycast, workchain, hash }
			}
			_ => {
				let anycast = load_anycast(&mut s)?;
				let len = s.load_uint(9)? as usize;
				let workchain = s.load_int(32)? as i32;
				MsgAddress::Var { anycast, workchain, address: s.load_bits(len)? }
			}
		};
		*slice = s;
		Ok(address)
	}

	pub fn store(&self, builder: &mut CellBuilder) -> Result<(), CellError> {
		match self {
			MsgAddress::None => {
				builder.store_uint(0b00, 2)?;
			}
			MsgAddress::External(address) => {
				builder.store_uint(0b01, 2)?.store_uint(address.len() as u128, 9)?.store_bits(address)?;
			}
			MsgAddress::Std { anycast, workchain, hash } => {
				builder.store_uint(0b10, 2)?;
				store_anycast(builder, anycast.as_ref())?;
				builder.store_int(*workchain as i128, 8)?.store_bytes(hash)?;
			}
			MsgAddress::Var { anycast, workchain, address } => {
				builder.store_uint(0b11, 2)?;
				store_anycast(builder, anycast.as_ref())?;
				builder.store_uint(address.len() as u128, 9)?.store_int(*workchain as i128, 32)?.store_bits(address)?;
			}
		}
		Ok(())
	}
}

// anycast_info$_ depth:(#<= 30) { depth >= 1 } rewrite_pfx:(bits depth)
fn load_anycast(slice: &mut CellSlice<'_>) -> Result<Option<BitString>, SliceError> {
	if !slice.load_bit()? {
		return Ok(None);
	}
	let depth = slice.load_uint_leq(30)?;
	if depth == 0 || depth > 30 {
		return Err(SliceError::InvalidAnycast(depth));
	}
	Ok(Some(slice.load_bits(depth)?))
}

fn store_anycast(builder: &mut CellBuilder, anycast: Option<&BitString>) -> Result<(), CellError> {
	match anycast {
		None => {
			builder.store_bit(false)?;
		}
		Some(prefix) => {
			builder.store_bit(true)?.store_uint(prefix.len() as u128, bits::width_leq(30))?.store_bits(prefix)?;
		}
	}
	Ok(())
}

/// The raw form: `workchain:hex` for internal addresses.
impl fmt::Display for MsgAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MsgAddress::None => write!(f, "addr_none"),
			MsgAddress::External(address) => write!(f, "ext:{}", bits::to_hex(address)),
			MsgAddress::Std { workchain, hash, .. } => write!(f, "{}:{}", workchain, hex::encode(hash)),
			MsgAddress::Var { workchain, address, .. } => write!(f, "{}:{}", workchain, bits::to_hex(address)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn std_address_round_trip() {
		let address = MsgAddress::std(-1, [0xab; 32]);
		let cell = CellBuilder::new().store_address(&address).unwrap().build().unwrap();
		assert_eq!(cell.bit_len(), 2 + 1 + 8 + 256);
		let loaded = cell.parse().load_address().unwrap();
		assert_eq!(loaded, address);
		assert_eq!(loaded.to_string(), format!("-1:{}", "ab".repeat(32)));
	}

	#[test]
	fn none_and_external() {
		let ext = MsgAddress::External(bits::from_bytes(&[0xff], 5));
		let cell = CellBuilder::new()
			.store_address(&MsgAddress::None)
			.unwrap()
			.store_address(&ext)
			.unwrap()
			.build()
			.unwrap();
		let mut slice = cell.parse();
		assert!(slice.load_address().unwrap().is_none());
		assert_eq!(slice.load_address().unwrap(), ext);
		assert!(slice.is_empty());
	}

	#[test]
	fn anycast_depth_zero_is_rejected() {
		let cell = CellBuilder::new().store_uint(0b10, 2).unwrap().store_bit(true).unwrap().store_uint(0, 5).unwrap().build().unwrap();
		let mut slice = cell.parse();
		assert_eq!(slice.load_address().unwrap_err(), SliceError::InvalidAnycast(0));
		assert_eq!(slice.remaining_bits(), 8);
	}
}
