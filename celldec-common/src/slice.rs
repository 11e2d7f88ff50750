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
	bits::{self, BitString, Bits},
	cell::{Cell, CellError},
};
use std::sync::Arc;

/// Errors raised while reading from a [`CellSlice`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
	#[error("Not enough data: needed {needed} bits but only {remaining} remain")]
	BitUnderflow { needed: usize, remaining: usize },
	#[error("Not enough references: reference {0} requested but the cell has fewer")]
	RefUnderflow(usize),
	#[error("Cannot load a {0} bit integer")]
	IntegerTooWide(usize),
	#[error("Snake data is not byte aligned ({0} bits)")]
	Unaligned(usize),
	#[error("Snake cell has {0} references, expected at most one")]
	SnakeBranch(usize),
	#[error("Anycast depth {0} is out of range")]
	InvalidAnycast(usize),
	#[error("Dictionary label of {len} bits exceeds the remaining key length {max}")]
	LabelOverflow { len: usize, max: usize },
	#[error("Dictionary has more than {0} edges")]
	DictionaryTooLarge(usize),
	#[error(transparent)]
	Cell(#[from] CellError),
}

/// A read cursor over the bits and references of a [`Cell`].
///
/// Slices are cheap to copy, which is how speculative parsers backtrack: parse from a copy
/// and only write it back on success.
#[derive(Debug, Clone, Copy)]
pub struct CellSlice<'a> {
	cell: &'a Cell,
	bit_pos: usize,
	ref_pos: usize,
}

impl<'a> CellSlice<'a> {
	pub fn new(cell: &'a Cell) -> Self {
		CellSlice { cell, bit_pos: 0, ref_pos: 0 }
	}

	/// The cell this slice reads from.
	pub fn cell(&self) -> &'a Cell {
		self.cell
	}

	pub fn remaining_bits(&self) -> usize {
		self.cell.bit_len() - self.bit_pos
	}

	pub fn remaining_refs(&self) -> usize {
		self.cell.refs().len() - self.ref_pos
	}

	/// True once every bit and every reference has been consumed.
	pub fn is_empty(&self) -> bool {
		self.remaining_bits() == 0 && self.remaining_refs() == 0
	}

	pub fn remaining_data(&self) -> &'a Bits {
		&self.cell.data()[self.bit_pos..]
	}

	pub fn remaining_ref_cells(&self) -> &'a [Arc<Cell>] {
		&self.cell.refs()[self.ref_pos..]
	}

	fn ensure(&self, needed: usize) -> Result<(), SliceError> {
		let remaining = self.remaining_bits();
		if needed > remaining {
			return Err(SliceError::BitUnderflow { needed, remaining });
		}
		Ok(())
	}

	pub fn skip(&mut self, bits: usize) -> Result<(), SliceError> {
		self.ensure(bits)?;
		self.bit_pos += bits;
		Ok(())
	}

	pub fn load_bit(&mut self) -> Result<bool, SliceError> {
		self.ensure(1)?;
		let bit = self.cell.data()[self.bit_pos];
		self.bit_pos += 1;
		Ok(bit)
	}

	/// Read an unsigned integer of up to 128 bits without advancing.
	pub fn preload_uint(&self, bits: usize) -> Result<u128, SliceError> {
		if bits > 128 {
			return Err(SliceError::IntegerTooWide(bits));
		}
		self.ensure(bits)?;
		Ok(bits::to_u128(&self.cell.data()[self.bit_pos..self.bit_pos + bits]))
	}

	pub fn load_uint(&mut self, bits: usize) -> Result<u128, SliceError> {
		let value = self.preload_uint(bits)?;
		self.bit_pos += bits;
		Ok(value)
	}

	/// Read a two's complement integer of up to 128 bits.
	pub fn load_int(&mut self, bits: usize) -> Result<i128, SliceError> {
		let raw = self.load_uint(bits)?;
		if bits == 0 {
			return Ok(0);
		}
		if bits == 128 {
			return Ok(raw as i128);
		}
		let sign = 1u128 << (bits - 1);
		Ok(if raw & sign != 0 { (raw as i128) - (1i128 << bits) } else { raw as i128 })
	}

	/// Read an unsigned integer of up to 256 bits as 32 big-endian bytes.
	pub fn load_uint256(&mut self, bits: usize) -> Result<[u8; 32], SliceError> {
		if bits > 256 {
			return Err(SliceError::IntegerTooWide(bits));
		}
		let value = self.load_bits(bits)?;
		let mut padded = BitString::repeat(false, 256 - bits);
		padded.extend_from_bitslice(&value);
		let mut out = [0u8; 32];
		out.copy_from_slice(&bits::to_bytes(&padded));
		Ok(out)
	}

	pub fn load_bits(&mut self, bits: usize) -> Result<BitString, SliceError> {
		self.ensure(bits)?;
		let out = self.cell.data()[self.bit_pos..self.bit_pos + bits].to_bitvec();
		self.bit_pos += bits;
		Ok(out)
	}

	pub fn load_bytes(&mut self, len: usize) -> Result<Vec<u8>, SliceError> {
		let bits = self.load_bits(len * 8)?;
		Ok(bits::to_bytes(&bits))
	}

	pub fn load_ref(&mut self) -> Result<&'a Arc<Cell>, SliceError> {
		let cell = self.cell.reference(self.ref_pos).ok_or(SliceError::RefUnderflow(self.ref_pos))?;
		self.ref_pos += 1;
		Ok(cell)
	}

	/// Read a `VarUInteger n` value, where `len_bits` is the width of its byte-length prefix.
	/// Returns the value as big-endian bytes.
	pub fn load_var_uint_bytes(&mut self, len_bits: usize) -> Result<Vec<u8>, SliceError> {
		let len = self.load_uint(len_bits)? as usize;
		self.load_bytes(len)
	}

	/// Read an amount of nanotons (`VarUInteger 16`).
	pub fn load_coins(&mut self) -> Result<u128, SliceError> {
		let len = self.load_uint(4)? as usize;
		self.load_uint(len * 8)
	}

	/// Read a number encoded as `#<= max`.
	pub fn load_uint_leq(&mut self, max: usize) -> Result<usize, SliceError> {
		Ok(self.load_uint(bits::width_leq(max))? as usize)
	}

	/// Read a unary-encoded number: a run of ones terminated by a zero.
	pub fn load_unary(&mut self) -> Result<usize, SliceError> {
		let mut n = 0;
		while self.load_bit()? {
			n += 1;
		}
		Ok(n)
	}

	pub fn load_address(&mut self) -> Result<MsgAddress, SliceError> {
		MsgAddress::load(self)
	}

	/// Read snake-encoded bytes: the rest of this slice followed by the chain of first
	/// references, each contributing its full data.
	pub fn load_snake_bytes(&mut self) -> Result<Vec<u8>, SliceError> {
		let mut out = Vec::new();
		let mut current = *self;
		let mut first = true;
		loop {
			let bits = current.remaining_bits();
			if bits % 8 != 0 {
				return Err(SliceError::Unaligned(bits));
			}
			out.extend(current.load_bytes(bits / 8)?);
			let next = match current.remaining_refs() {
				0 => None,
				1 => Some(current.load_ref()?),
				n => return Err(SliceError::SnakeBranch(n)),
			};
			if first {
				*self = current;
				first = false;
			}
			match next {
				Some(cell) => current = cell.parse(),
				None => return Ok(out),
			}
		}
	}

	/// Copy the unread part of this slice into a fresh ordinary cell, consuming it.
	pub fn to_cell(&mut self) -> Result<Arc<Cell>, SliceError> {
		let cell = Cell::new(self.remaining_data().to_bitvec(), self.remaining_ref_cells().to_vec())?;
		self.bit_pos = self.cell.bit_len();
		self.ref_pos = self.cell.refs().len();
		Ok(Arc::new(cell))
	}
}
