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

//! Reading `Hashmap n X` dictionaries: a binary trie of cells, each edge carrying a
//! compressed label.
//!
//! ```text
//! hm_edge#_ {n:#} {X:Type} {l:#} {m:#} label:(HmLabel ~l n) {n = (~m) + l} node:(HashmapNode m X) = Hashmap n X;
//! hmn_leaf#_ {X:Type} value:X = HashmapNode 0 X;
//! hmn_fork#_ {n:#} {X:Type} left:^(Hashmap n X) right:^(Hashmap n X) = HashmapNode (n + 1) X;
//! hml_short$0 {m:#} {n:#} len:(Unary ~n) {n <= m} s:(n * Bit) = HmLabel ~n m;
//! hml_long$10 {m:#} n:(#<= m) s:(n * Bit) = HmLabel ~n m;
//! hml_same$11 {m:#} v:Bit n:(#<= m) = HmLabel ~n m;
//! ```

use crate::{
	bits::BitString,
	cell::Cell,
	slice::{CellSlice, SliceError},
};

/// The most edges a single dictionary may have. A fork can reference the same subtree
/// twice, so the edge count is not bounded by the size of the bag of cells.
pub const MAX_DICT_EDGES: usize = 1 << 15;

/// Walk the dictionary rooted at `root`, whose keys are `key_bits` long, handing each leaf
/// to `leaf` positioned just after its label. Entries are returned in key order.
pub fn parse_hashmap<'a, T, E, F>(root: &'a Cell, key_bits: usize, mut leaf: F) -> Result<Vec<(BitString, T)>, E>
where
	F: FnMut(&mut CellSlice<'a>) -> Result<T, E>,
	E: From<SliceError>,
{
	let mut out = Vec::new();
	let mut prefix = BitString::with_capacity(key_bits);
	let mut edges = 0;
	parse_edge(root, key_bits, &mut prefix, &mut edges, &mut leaf, &mut out)?;
	Ok(out)
}

fn parse_edge<'a, T, E, F>(
	cell: &'a Cell,
	remaining: usize,
	prefix: &mut BitString,
	edges: &mut usize,
	leaf: &mut F,
	out: &mut Vec<(BitString, T)>,
) -> Result<(), E>
where
	F: FnMut(&mut CellSlice<'a>) -> Result<T, E>,
	E: From<SliceError>,
{
	*edges += 1;
	if *edges > MAX_DICT_EDGES {
		return Err(SliceError::DictionaryTooLarge(MAX_DICT_EDGES).into());
	}
	let mut slice = cell.parse();
	let label = load_label(&mut slice, remaining)?;
	let label_len = label.len();
	prefix.extend_from_bitslice(&label);

	let rest = remaining - label_len;
	if rest == 0 {
		let value = leaf(&mut slice)?;
		out.push((prefix.clone(), value));
	} else {
		let left = slice.load_ref()?;
		let right = slice.load_ref()?;
		for (bit, child) in [(false, left), (true, right)] {
			prefix.push(bit);
			parse_edge(child, rest - 1, prefix, edges, leaf, out)?;
			prefix.pop();
		}
	}

	prefix.truncate(prefix.len() - label_len);
	Ok(())
}

fn load_label(slice: &mut CellSlice<'_>, max: usize) -> Result<BitString, SliceError> {
	let label = if !slice.load_bit()? {
		let len = slice.load_unary()?;
		if len > max {
			return Err(SliceError::LabelOverflow { len, max });
		}
		slice.load_bits(len)?
	} else if !slice.load_bit()? {
		let len = slice.load_uint_leq(max)?;
		if len > max {
			return Err(SliceError::LabelOverflow { len, max });
		}
		slice.load_bits(len)?
	} else {
		let bit = slice.load_bit()?;
		let len = slice.load_uint_leq(max)?;
		if len > max {
			return Err(SliceError::LabelOverflow { len, max });
		}
		BitString::repeat(bit, len)
	};
	Ok(label)
}
