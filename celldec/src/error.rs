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

use celldec_blocks::BlockError;
use celldec_tlb::{SchemaError, TlbError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Could not read the input as a cell: {0}")]
	InvalidInput(String),
	#[error(transparent)]
	Schema(#[from] SchemaError),
}

/// Why a single strategy could not decode a cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
	#[error("Schema hint does not compile: {0}")]
	Schema(#[from] SchemaError),
	#[error(transparent)]
	Tlb(#[from] TlbError),
	#[error(transparent)]
	Block(#[from] BlockError),
}
