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

//! Decode cells with schemas written in a subset of TL-B.
//!
//! ```text
//! transfer#0f8a7ea5 query_id:uint64 amount:(VarUInteger 16) = Transfer;
//! ```
//!
//! [`Schema::compile`] turns such text into a [`Schema`], and [`Schema::deserialize`] reads a
//! cell with it. [`Library::bundled`] provides schemas for well-known message formats.

#![forbid(unsafe_code)]

mod error;
mod lexer;
mod library;
mod parser;
mod runtime;
mod schema;

pub use error::{SchemaError, TlbError};
pub use library::{Library, TEXT_COMMENT};
pub use runtime::MAX_NESTING;
pub use schema::{Constructor, Field, Schema, TypeDef, TypeExpr};
