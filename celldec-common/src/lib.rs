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

//! Common types shared by every celldec decoder: the [`Cell`] model, reading and building
//! cells, the bag-of-cells codec, and the [`Value`] type decoders produce.

#![forbid(unsafe_code)]

pub mod address;
pub mod bits;
pub mod boc;
mod builder;
mod cell;
pub mod dict;
mod slice;
pub mod value;

pub use address::MsgAddress;
pub use bits::{BitString, Bits};
pub use boc::BocError;
pub use builder::CellBuilder;
pub use cell::{Cell, CellError, CellHash, MAX_BITS, MAX_DEPTH, MAX_REFS};
pub use slice::{CellSlice, SliceError};
pub use value::{Dictionary, ExpandedCell, Primitive, Structured, Value};
