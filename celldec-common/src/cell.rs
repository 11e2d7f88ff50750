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
	bits::{self, BitString, Bits},
	boc,
	slice::CellSlice,
};
use sha2::{Digest, Sha256};
use std::{fmt, hash::Hash, sync::Arc};

/// The maximum number of data bits a single cell can hold.
pub const MAX_BITS: usize = 1023;
/// The maximum number of child references a single cell can hold.
pub const MAX_REFS: usize = 4;
/// The longest chain of references allowed below a cell.
pub const MAX_DEPTH: u16 = 1024;

/// SHA-256 representation hash of a cell.
pub type CellHash = [u8; 32];

/// Errors raised while constructing a cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
	#[error("Cell data overflow: {0} bits exceeds the 1023 bit limit")]
	BitOverflow(usize),
	#[error("Cell reference overflow: {0} references exceeds the limit of 4")]
	RefOverflow(usize),
	#[error("Cell depth overflow: references nest deeper than 1024 levels")]
	DepthOverflow,
	#[error("Value {value} does not fit into {bits} bits")]
	ValueOverflow { value: String, bits: usize },
	#[error("Exotic cell must start with a type byte")]
	MissingExoticType,
}

/// An immutable node of the cell tree: up to 1023 bits of data and up to four references
/// to other cells.
///
/// Cells are compared and hashed by their representation hash, which is computed once at
/// construction. Exotic cells keep the level mask they were deserialized with, but their
/// hash is always the level-0 representation hash.
#[derive(Clone)]
pub struct Cell {
	data: BitString,
	refs: Vec<Arc<Cell>>,
	exotic: bool,
	level_mask: u8,
	depth: u16,
	hash: CellHash,
}

impl Cell {
	/// Create a new ordinary cell.
	pub fn new(data: BitString, refs: Vec<Arc<Cell>>) -> Result<Self, CellError> {
		Self::with_kind(data, refs, false, 0)
	}

	/// Create a new exotic cell. The first byte of `data` is the exotic cell type.
	pub fn exotic(data: BitString, refs: Vec<Arc<Cell>>, level_mask: u8) -> Result<Self, CellError> {
		if data.len() < 8 {
			return Err(CellError::MissingExoticType);
		}
		Self::with_kind(data, refs, true, level_mask)
	}

	/// A cell with no data and no references.
	pub fn empty() -> Self {
		let data = BitString::new();
		let hash = compute_hash(descriptors(0, false, 0, 0), &data, &[]);
		Cell { data, refs: Vec::new(), exotic: false, level_mask: 0, depth: 0, hash }
	}

	fn with_kind(data: BitString, refs: Vec<Arc<Cell>>, exotic: bool, level_mask: u8) -> Result<Self, CellError> {
		if data.len() > MAX_BITS {
			return Err(CellError::BitOverflow(data.len()));
		}
		if refs.len() > MAX_REFS {
			return Err(CellError::RefOverflow(refs.len()));
		}
		let mut depth = 0u16;
		for r in &refs {
			match r.depth.checked_add(1) {
				Some(d) if d <= MAX_DEPTH => depth = depth.max(d),
				_ => return Err(CellError::DepthOverflow),
			}
		}
		let d = descriptors(refs.len(), exotic, level_mask, data.len());
		let hash = compute_hash(d, &data, &refs);
		Ok(Cell { data, refs, exotic, level_mask, depth, hash })
	}

	/// The data bits of this cell.
	pub fn data(&self) -> &Bits {
		&self.data
	}

	pub fn bit_len(&self) -> usize {
		self.data.len()
	}

	pub fn refs(&self) -> &[Arc<Cell>] {
		&self.refs
	}

	pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
		self.refs.get(index)
	}

	pub fn is_exotic(&self) -> bool {
		self.exotic
	}

	pub fn level_mask(&self) -> u8 {
		self.level_mask
	}

	/// The exotic cell type, if this is an exotic cell.
	pub fn exotic_type(&self) -> Option<u8> {
		if self.exotic {
			Some(bits::to_u128(&self.data[..8]) as u8)
		} else {
			None
		}
	}

	/// Length of the longest path of references below this cell.
	pub fn depth(&self) -> u16 {
		self.depth
	}

	pub fn hash(&self) -> &CellHash {
		&self.hash
	}

	pub fn hash_hex(&self) -> String {
		hex::encode(self.hash)
	}

	/// The two descriptor bytes that prefix this cell in its serialized form.
	pub fn descriptors(&self) -> [u8; 2] {
		descriptors(self.refs.len(), self.exotic, self.level_mask, self.data.len())
	}

	/// Begin reading this cell from its first bit and reference.
	pub fn parse(&self) -> CellSlice<'_> {
		CellSlice::new(self)
	}

	/// Serialize this cell (and everything it references) as a single-root bag of cells.
	pub fn to_boc(&self) -> Vec<u8> {
		boc::serialize(self)
	}

	/// Hex of [`Cell::to_boc`], the canonical textual form of a cell.
	pub fn to_boc_hex(&self) -> String {
		hex::encode(self.to_boc())
	}

	fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
		let kind = if self.exotic { "*" } else { "" };
		writeln!(f, "{:indent$}{}x{{{}}}", "", kind, bits::to_hex(&self.data).to_uppercase(), indent = indent)?;
		for r in &self.refs {
			r.fmt_tree(f, indent + 1)?;
		}
		Ok(())
	}
}

fn descriptors(refs: usize, exotic: bool, level_mask: u8, bit_len: usize) -> [u8; 2] {
	let exotic_flag: u8 = if exotic { 8 } else { 0 };
	let d1 = refs as u8 + exotic_flag + (level_mask << 5);
	let d2 = (bit_len / 8 + (bit_len + 7) / 8) as u8;
	[d1, d2]
}

fn compute_hash(d: [u8; 2], data: &Bits, refs: &[Arc<Cell>]) -> CellHash {
	let mut hasher = Sha256::new();
	hasher.update(d);
	hasher.update(bits::to_padded_bytes(data));
	for r in refs {
		hasher.update(r.depth.to_be_bytes());
	}
	for r in refs {
		hasher.update(r.hash);
	}
	hasher.finalize().into()
}

impl PartialEq for Cell {
	fn eq(&self, other: &Self) -> bool {
		self.hash == other.hash
	}
}

impl Eq for Cell {}

impl Hash for Cell {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.hash.hash(state)
	}
}

impl Default for Cell {
	fn default() -> Self {
		Cell::empty()
	}
}

impl fmt::Debug for Cell {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cell")
			.field("data", &bits::to_hex(&self.data))
			.field("exotic", &self.exotic)
			.field("refs", &self.refs)
			.finish()
	}
}

/// Renders the cell tree the way Fift prints it: one `x{...}` line per cell, references
/// indented below their parent.
impl fmt::Display for Cell {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.fmt_tree(f, 0)
	}
}
