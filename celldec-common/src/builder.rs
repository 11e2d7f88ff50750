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
	address::MsgAddress,
	bits::{BitString, Bits},
	cell::{Cell, CellError, MAX_BITS, MAX_REFS},
	slice::CellSlice,
};
use std::sync::Arc;

/// Incrementally assembles the bits and references of a new [`Cell`].
///
/// Every `store_*` method checks the cell limits up front, so a failed store leaves the
/// builder untouched.
#[derive(Debug, Default, Clone)]
pub struct CellBuilder {
	data: BitString,
	refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bit_len(&self) -> usize {
		self.data.len()
	}

	pub fn ref_count(&self) -> usize {
		self.refs.len()
	}

	fn ensure_bits(&self, additional: usize) -> Result<(), CellError> {
		let total = self.data.len() + additional;
		if total > MAX_BITS {
			return Err(CellError::BitOverflow(total));
		}
		Ok(())
	}

	pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
		self.ensure_bits(1)?;
		self.data.push(bit);
		Ok(self)
	}

	/// Store `value` as an unsigned big-endian integer of exactly `bits` bits.
	pub fn store_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self, CellError> {
		if bits < 128 && value >> bits != 0 {
			return Err(CellError::ValueOverflow { value: value.to_string(), bits });
		}
		self.ensure_bits(bits)?;
		let padding = bits.saturating_sub(128);
		for _ in 0..padding {
			self.data.push(false);
		}
		self.push_low_bits(value, bits - padding);
		Ok(self)
	}

	/// Store `value` as a two's complement integer of exactly `bits` bits (at most 128).
	pub fn store_int(&mut self, value: i128, bits: usize) -> Result<&mut Self, CellError> {
		let fits = match bits {
			0 => value == 0,
			1..=127 => {
				let bound = 1i128 << (bits - 1);
				(-bound..bound).contains(&value)
			}
			128 => true,
			_ => false,
		};
		if !fits {
			return Err(CellError::ValueOverflow { value: value.to_string(), bits });
		}
		self.ensure_bits(bits)?;
		self.push_low_bits(value as u128, bits);
		Ok(self)
	}

	fn push_low_bits(&mut self, value: u128, bits: usize) {
		for i in (0..bits).rev() {
			self.data.push((value >> i) & 1 == 1);
		}
	}

	pub fn store_bits(&mut self, bits: &Bits) -> Result<&mut Self, CellError> {
		self.ensure_bits(bits.len())?;
		self.data.extend_from_bitslice(bits);
		Ok(self)
	}

	pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
		self.ensure_bits(bytes.len() * 8)?;
		for byte in bytes {
			self.push_low_bits(*byte as u128, 8);
		}
		Ok(self)
	}

	pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self, CellError> {
		if self.refs.len() >= MAX_REFS {
			return Err(CellError::RefOverflow(self.refs.len() + 1));
		}
		self.refs.push(cell);
		Ok(self)
	}

	/// Store an amount of nanotons using the `VarUInteger 16` encoding.
	pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self, CellError> {
		let len = (128 - amount.leading_zeros() as usize + 7) / 8;
		if len > 15 {
			return Err(CellError::ValueOverflow { value: amount.to_string(), bits: 120 });
		}
		self.ensure_bits(4 + len * 8)?;
		self.push_low_bits(len as u128, 4);
		self.push_low_bits(amount, len * 8);
		Ok(self)
	}

	pub fn store_address(&mut self, address: &MsgAddress) -> Result<&mut Self, CellError> {
		address.store(self)?;
		Ok(self)
	}

	/// Append the unread bits and references of `slice`.
	pub fn store_slice(&mut self, slice: &CellSlice<'_>) -> Result<&mut Self, CellError> {
		let refs = slice.remaining_ref_cells();
		if self.refs.len() + refs.len() > MAX_REFS {
			return Err(CellError::RefOverflow(self.refs.len() + refs.len()));
		}
		self.store_bits(slice.remaining_data())?;
		self.refs.extend(refs.iter().cloned());
		Ok(self)
	}

	pub fn build(&self) -> Result<Arc<Cell>, CellError> {
		Cell::new(self.data.clone(), self.refs.clone()).map(Arc::new)
	}
}
