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

use celldec_common::SliceError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
	#[error(transparent)]
	Slice(#[from] SliceError),
	#[error("Cell of {0} bits is too short to carry a layout tag")]
	TooShort(usize),
	#[error("No known layout has the tag {0:#010x}")]
	UnknownTag(u32),
	#[error("Unknown exotic cell type {0}")]
	UnknownExotic(u8),
	#[error("Unexpected tag {found:#x} for {layout}")]
	InvalidTag { layout: &'static str, found: u128 },
	#[error("Layout `{layout}` left {bits} bits and {refs} references unread")]
	Trailing { layout: &'static str, bits: usize, refs: usize },
}
