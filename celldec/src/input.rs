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

use crate::error::Error;
use base64::{engine::general_purpose::STANDARD, Engine};
use celldec_common::{boc, Cell};
use std::sync::Arc;

/// Read the root cell of a bag of cells given as base64 or, failing that, as hex.
pub fn parse_input(input: &str) -> Result<Arc<Cell>, Error> {
	let input = input.trim();
	if input.is_empty() {
		return Err(Error::InvalidInput("input is empty".into()));
	}

	let base64_err = match STANDARD.decode(input) {
		Ok(bytes) => match first_root(&bytes) {
			Ok(root) => return Ok(root),
			Err(e) => e,
		},
		Err(e) => e.to_string(),
	};
	log::trace!("input is not a base64 bag of cells: {}", base64_err);

	let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
	let hex_err = match hex::decode(digits) {
		Ok(bytes) => match first_root(&bytes) {
			Ok(root) => return Ok(root),
			Err(e) => e,
		},
		Err(e) => e.to_string(),
	};

	Err(Error::InvalidInput(format!("as base64: {}; as hex: {}", base64_err, hex_err)))
}

fn first_root(bytes: &[u8]) -> Result<Arc<Cell>, String> {
	let roots = boc::deserialize(bytes).map_err(|e| e.to_string())?;
	roots.into_iter().next().ok_or_else(|| "no root cell".to_string())
}
