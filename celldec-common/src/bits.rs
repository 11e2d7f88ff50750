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

//! Bit string helpers shared by the cell model and the BOC codec.

use bitvec::{order::Msb0, slice::BitSlice, vec::BitVec};

/// An owned, most-significant-bit-first sequence of bits, as stored in a cell.
pub type BitString = BitVec<u8, Msb0>;

/// A borrowed view into a [`BitString`].
pub type Bits = BitSlice<u8, Msb0>;

/// Build a bit string from the first `len` bits of `bytes`.
pub fn from_bytes(bytes: &[u8], len: usize) -> BitString {
	let mut bits = BitString::with_capacity(len);
	for i in 0..len {
		let byte = bytes[i / 8];
		bits.push(byte & (0x80 >> (i % 8)) != 0);
	}
	bits
}

/// Pack bits into bytes. A trailing partial byte is padded with zeros.
pub fn to_bytes(bits: &Bits) -> Vec<u8> {
	let mut out = vec![0u8; (bits.len() + 7) / 8];
	for (i, bit) in bits.iter().by_vals().enumerate() {
		if bit {
			out[i / 8] |= 0x80 >> (i % 8);
		}
	}
	out
}

/// Pack bits into bytes, appending the completion tag (a single `1` followed by zeros)
/// when the length is not a multiple of eight.
pub fn to_padded_bytes(bits: &Bits) -> Vec<u8> {
	let mut out = to_bytes(bits);
	if bits.len() % 8 != 0 {
		let last = out.len() - 1;
		out[last] |= 0x80 >> (bits.len() % 8);
	}
	out
}

/// Hex representation of a bit string. Lengths that are not a multiple of four are
/// completion-tagged at nibble granularity and marked with a trailing `_`.
pub fn to_hex(bits: &Bits) -> String {
	if bits.len() % 8 == 0 {
		return hex::encode(to_bytes(bits));
	}
	let mut tagged = bits.to_bitvec();
	let aligned = bits.len() % 4 == 0;
	if !aligned {
		tagged.push(true);
		while tagged.len() % 4 != 0 {
			tagged.push(false);
		}
	}
	let mut out = hex::encode(to_bytes(&tagged));
	// `to_bytes` pads to a full byte, drop the spare nibble.
	if tagged.len() % 8 != 0 {
		out.pop();
	}
	if !aligned {
		out.push('_');
	}
	out
}

/// Read up to 128 bits as an unsigned big-endian integer.
pub fn to_u128(bits: &Bits) -> u128 {
	bits.iter().by_vals().fold(0u128, |acc, bit| (acc << 1) | bit as u128)
}

/// The number of bits used by the `#<= max` encoding.
pub fn width_leq(max: usize) -> usize {
	(usize::BITS - max.leading_zeros()) as usize
}

/// The number of bits used by the `#< max` encoding.
pub fn width_lt(max: usize) -> usize {
	width_leq(max.saturating_sub(1))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_marks_incomplete_nibbles() {
		let bits = from_bytes(&[0b1010_0000], 3);
		assert_eq!(to_hex(&bits), "b_");
		let bits = from_bytes(&[0xab, 0xc0], 12);
		assert_eq!(to_hex(&bits), "abc");
		let bits = from_bytes(&[0xab], 8);
		assert_eq!(to_hex(&bits), "ab");
		assert_eq!(to_hex(&BitString::new()), "");
	}

	#[test]
	fn padded_bytes_carry_completion_tag() {
		let bits = from_bytes(&[0b1100_0000], 2);
		assert_eq!(to_padded_bytes(&bits), vec![0b1110_0000]);
		let bits = from_bytes(&[0xff], 8);
		assert_eq!(to_padded_bytes(&bits), vec![0xff]);
	}

	#[test]
	fn leq_widths() {
		assert_eq!(width_leq(0), 0);
		assert_eq!(width_leq(1), 1);
		assert_eq!(width_leq(8), 4);
		assert_eq!(width_leq(30), 5);
		assert_eq!(width_lt(16), 4);
		assert_eq!(width_lt(32), 5);
	}
}
