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

//! The bag-of-cells (BOC) serialization format.
//!
//! ```text
//! serialized_boc#b5ee9c72 has_idx:(## 1) has_crc32c:(## 1) has_cache_bits:(## 1) flags:(## 2) { flags = 0 }
//!   size:(## 3) { size <= 4 } off_bytes:(## 8) { off_bytes <= 8 }
//!   cells:(##(size * 8)) roots:(##(size * 8)) { roots >= 1 } absent:(##(size * 8)) { roots + absent <= cells }
//!   tot_cells_size:(##(off_bytes * 8)) root_list:(roots * ##(size * 8))
//!   index:has_idx?(cells * ##(off_bytes * 8)) cell_data:(tot_cells_size * [ uint8 ])
//!   crc32c:has_crc32c?uint32 = BagOfCells;
//! ```

use crate::{
	bits,
	cell::{Cell, CellError, CellHash},
};
use std::{collections::HashMap, collections::HashSet, sync::Arc};

const BOC_GENERIC: u32 = 0xb5ee_9c72;
const BOC_INDEXED: u32 = 0x68ff_65f3;
const BOC_INDEXED_CRC32: u32 = 0xacc3_a728;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BocError {
	#[error("Unexpected end of bag of cells at byte {0}")]
	UnexpectedEof(usize),
	#[error("Unknown bag of cells magic {0:#010x}")]
	UnknownMagic(u32),
	#[error("Invalid reference size {0}, expected 1 to 4 bytes")]
	InvalidRefSize(usize),
	#[error("Invalid offset size {0}, expected 1 to 8 bytes")]
	InvalidOffsetSize(usize),
	#[error("Bag of cells declares no root cells")]
	NoRoots,
	#[error("Root index {0} is out of range")]
	RootOutOfRange(usize),
	#[error("Absent cells are not supported")]
	AbsentCells,
	#[error("Cell {cell} references cell {reference}, which does not come after it")]
	BackReference { cell: usize, reference: usize },
	#[error("Cell {0} has an invalid completion tag")]
	InvalidCompletionTag(usize),
	#[error("Cell data is {actual} bytes but the header declares {declared}")]
	SizeMismatch { declared: usize, actual: usize },
	#[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
	ChecksumMismatch { stored: u32, computed: u32 },
	#[error("Cell {index}: {source}")]
	Cell {
		index: usize,
		#[source]
		source: CellError,
	},
}

struct Reader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	fn take(&mut self, len: usize) -> Result<&'a [u8], BocError> {
		let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len()).ok_or(BocError::UnexpectedEof(self.pos))?;
		let out = &self.data[self.pos..end];
		self.pos = end;
		Ok(out)
	}

	fn byte(&mut self) -> Result<u8, BocError> {
		Ok(self.take(1)?[0])
	}

	fn uint(&mut self, len: usize) -> Result<usize, BocError> {
		Ok(self.take(len)?.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize))
	}
}

struct RawCell {
	data: bits::BitString,
	refs: Vec<usize>,
	exotic: bool,
	level_mask: u8,
}

/// Deserialize a bag of cells, returning its root cells in order.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Arc<Cell>>, BocError> {
	let mut reader = Reader { data: bytes, pos: 0 };
	let magic = reader.uint(4)? as u32;

	let (has_idx, has_crc, size) = match magic {
		BOC_GENERIC => {
			let flags = reader.byte()?;
			(flags & 0x80 != 0, flags & 0x40 != 0, (flags & 0x07) as usize)
		}
		BOC_INDEXED => (true, false, reader.byte()? as usize),
		BOC_INDEXED_CRC32 => (true, true, reader.byte()? as usize),
		other => return Err(BocError::UnknownMagic(other)),
	};
	if !(1..=4).contains(&size) {
		return Err(BocError::InvalidRefSize(size));
	}
	let off_bytes = reader.byte()? as usize;
	if !(1..=8).contains(&off_bytes) {
		return Err(BocError::InvalidOffsetSize(off_bytes));
	}

	let cell_count = reader.uint(size)?;
	let root_count = reader.uint(size)?;
	let absent = reader.uint(size)?;
	let total_size = reader.uint(off_bytes)?;
	if root_count == 0 {
		return Err(BocError::NoRoots);
	}
	if absent != 0 {
		return Err(BocError::AbsentCells);
	}

	let roots = if magic == BOC_GENERIC {
		(0..root_count).map(|_| reader.uint(size)).collect::<Result<Vec<_>, _>>()?
	} else {
		vec![0]
	};
	if has_idx {
		reader.take(cell_count.saturating_mul(off_bytes))?;
	}

	let cell_data = reader.take(total_size)?;
	log::trace!("bag of cells: {} cells, {} roots, {} bytes of cell data", cell_count, root_count, total_size);
	if has_crc {
		let covered = &bytes[..reader.pos];
		let stored = u32::from_le_bytes([reader.byte()?, reader.byte()?, reader.byte()?, reader.byte()?]);
		let computed = crc32c::crc32c(covered);
		if stored != computed {
			return Err(BocError::ChecksumMismatch { stored, computed });
		}
	}

	let mut cells_reader = Reader { data: cell_data, pos: 0 };
	let mut raw = Vec::with_capacity(cell_count.min(cell_data.len() / 2));
	for index in 0..cell_count {
		raw.push(read_cell(&mut cells_reader, index, size)?);
	}
	if cells_reader.pos != cell_data.len() {
		return Err(BocError::SizeMismatch { declared: cell_data.len(), actual: cells_reader.pos });
	}

	// References always point forward, so building from the back resolves every child first.
	let mut built: Vec<Option<Arc<Cell>>> = vec![None; raw.len()];
	for (index, cell) in raw.into_iter().enumerate().rev() {
		let mut refs = Vec::with_capacity(cell.refs.len());
		for reference in cell.refs {
			match built.get(reference).and_then(|c| c.clone()) {
				Some(child) if reference > index => refs.push(child),
				_ => return Err(BocError::BackReference { cell: index, reference }),
			}
		}
		let built_cell = if cell.exotic {
			Cell::exotic(cell.data, refs, cell.level_mask)
		} else {
			Cell::new(cell.data, refs)
		}
		.map_err(|source| BocError::Cell { index, source })?;
		built[index] = Some(Arc::new(built_cell));
	}

	roots.into_iter().map(|root| built.get(root).and_then(|c| c.clone()).ok_or(BocError::RootOutOfRange(root))).collect()
}

fn read_cell(reader: &mut Reader<'_>, index: usize, size: usize) -> Result<RawCell, BocError> {
	let d1 = reader.byte()?;
	let d2 = reader.byte()?;
	let ref_count = (d1 & 0x07) as usize;
	let exotic = d1 & 0x08 != 0;
	let with_hashes = d1 & 0x10 != 0;
	let level_mask = d1 >> 5;
	if ref_count > 4 {
		return Err(BocError::AbsentCells);
	}
	if with_hashes {
		let hash_count = level_mask.count_ones() as usize + 1;
		reader.take(hash_count * (32 + 2))?;
	}

	let data_len = (d2 as usize + 1) / 2;
	let data = reader.take(data_len)?;
	let bit_len = if d2 % 2 == 0 {
		data_len * 8
	} else {
		let last = data[data_len - 1];
		if last == 0 {
			return Err(BocError::InvalidCompletionTag(index));
		}
		data_len * 8 - last.trailing_zeros() as usize - 1
	};

	let refs = (0..ref_count).map(|_| reader.uint(size)).collect::<Result<Vec<_>, _>>()?;
	Ok(RawCell { data: bits::from_bytes(data, bit_len), refs, exotic, level_mask })
}

/// Serialize `root` and every cell below it as a bag of cells with a CRC32C checksum and no
/// index. Identical subtrees are stored once.
pub fn serialize(root: &Cell) -> Vec<u8> {
	let mut seen = HashSet::new();
	let mut order = Vec::new();
	collect(root, &mut seen, &mut order);
	// Reverse post-order puts every parent before its children and the root first.
	order.reverse();

	let indices: HashMap<&CellHash, usize> = order.iter().enumerate().map(|(i, cell)| (cell.hash(), i)).collect();
	let size = byte_width(order.len());

	let mut cell_data = Vec::new();
	for cell in &order {
		cell_data.extend_from_slice(&cell.descriptors());
		cell_data.extend(bits::to_padded_bytes(cell.data()));
		for reference in cell.refs() {
			let index = indices[reference.hash()];
			cell_data.extend_from_slice(&index.to_be_bytes()[std::mem::size_of::<usize>() - size..]);
		}
	}
	let off_bytes = byte_width(cell_data.len());

	let mut out = Vec::with_capacity(cell_data.len() + 32);
	out.extend_from_slice(&BOC_GENERIC.to_be_bytes());
	out.push(0x40 | size as u8);
	out.push(off_bytes as u8);
	push_uint(&mut out, order.len(), size);
	push_uint(&mut out, 1, size);
	push_uint(&mut out, 0, size);
	push_uint(&mut out, cell_data.len(), off_bytes);
	push_uint(&mut out, 0, size);
	out.extend(cell_data);
	let crc = crc32c::crc32c(&out);
	out.extend_from_slice(&crc.to_le_bytes());
	out
}

fn collect<'a>(cell: &'a Cell, seen: &mut HashSet<&'a CellHash>, order: &mut Vec<&'a Cell>) {
	if !seen.insert(cell.hash()) {
		return;
	}
	for reference in cell.refs() {
		collect(reference, seen, order);
	}
	order.push(cell);
}

fn byte_width(value: usize) -> usize {
	let bits = (usize::BITS - value.leading_zeros()) as usize;
	((bits + 7) / 8).max(1)
}

fn push_uint(out: &mut Vec<u8>, value: usize, len: usize) {
	out.extend_from_slice(&value.to_be_bytes()[std::mem::size_of::<usize>() - len..]);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::CellBuilder;
	use base64::{engine::general_purpose::STANDARD, Engine};

	fn comment_cell() -> Arc<Cell> {
		CellBuilder::new().store_uint(0, 32).unwrap().store_bytes(b"hi").unwrap().build().unwrap()
	}

	#[test]
	fn serializes_with_checksum() {
		let boc = comment_cell().to_boc();
		assert_eq!(hex::encode(&boc), "b5ee9c7241010101000800000c000000006869e87b32e9");
		assert_eq!(STANDARD.encode(&boc), "te6cckEBAQEACAAADAAAAABoaeh7Muk=");
	}

	#[test]
	fn parses_without_checksum() {
		let bytes = hex::decode("b5ee9c7201010101000800000c000000006869").unwrap();
		let roots = deserialize(&bytes).unwrap();
		assert_eq!(roots.len(), 1);
		assert_eq!(roots[0], comment_cell());
	}

	#[test]
	fn detects_corruption() {
		let mut boc = comment_cell().to_boc();
		let len = boc.len();
		boc[len - 6] ^= 0x01;
		assert!(matches!(deserialize(&boc), Err(BocError::ChecksumMismatch { .. })));
		assert_eq!(deserialize(b"not-a-cell"), Err(BocError::UnknownMagic(0x6e6f742d)));
		assert_eq!(deserialize(&[0xb5, 0xee]), Err(BocError::UnexpectedEof(0)));
	}

	#[test]
	fn shared_subtrees_round_trip() {
		let shared = CellBuilder::new().store_uint(0xdead, 16).unwrap().build().unwrap();
		let middle = CellBuilder::new().store_bit(true).unwrap().store_ref(shared.clone()).unwrap().build().unwrap();
		let root = CellBuilder::new()
			.store_uint(7, 3)
			.unwrap()
			.store_ref(middle)
			.unwrap()
			.store_ref(shared)
			.unwrap()
			.build()
			.unwrap();

		let boc = root.to_boc();
		// three distinct cells, the shared one is stored once
		assert_eq!(boc[6], 3);
		let parsed = deserialize(&boc).unwrap();
		assert_eq!(parsed[0], root);
		assert_eq!(parsed[0].to_string(), root.to_string());
		assert!(Arc::ptr_eq(&parsed[0].refs()[1], &parsed[0].refs()[0].refs()[0]));
	}

	#[test]
	fn rejects_back_references() {
		// two cells, the second pointing back at the first
		let bytes = hex::decode("b5ee9c72010102010005000000010000").unwrap();
		assert!(matches!(deserialize(&bytes), Err(BocError::BackReference { cell: 1, reference: 0 })));
	}

	/// A bag of `len` cells where every cell but the last references the next one.
	fn linear_chain(len: usize) -> Vec<u8> {
		let mut cells = Vec::new();
		for index in 0..len {
			if index + 1 < len {
				cells.extend_from_slice(&[0x01, 0x00]);
				cells.extend_from_slice(&((index + 1) as u16).to_be_bytes());
			} else {
				cells.extend_from_slice(&[0x00, 0x00]);
			}
		}
		let mut boc = BOC_GENERIC.to_be_bytes().to_vec();
		boc.extend_from_slice(&[0x02, 0x02]);
		boc.extend_from_slice(&(len as u16).to_be_bytes());
		boc.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]);
		boc.extend_from_slice(&(cells.len() as u16).to_be_bytes());
		boc.extend_from_slice(&[0x00, 0x00]);
		boc.extend(cells);
		boc
	}

	#[test]
	fn deep_chains_are_rejected() {
		let roots = deserialize(&linear_chain(crate::MAX_DEPTH as usize + 1)).unwrap();
		assert_eq!(roots[0].depth(), crate::MAX_DEPTH);
		assert_eq!(
			deserialize(&linear_chain(crate::MAX_DEPTH as usize + 2)),
			Err(BocError::Cell { index: 0, source: CellError::DepthOverflow })
		);
	}
}
