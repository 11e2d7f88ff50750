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

use celldec::{Decoded, Decoder, Limits, SchemaHint};
use clap::{Parser, ValueEnum};
use std::{
	io::{self, Read},
	path::PathBuf,
};

/// Decode a bag of cells given as base64 or hex.
#[derive(Debug, Parser)]
#[command(name = "cell-decoder", version)]
struct Opts {
	/// The encoded bag of cells. Read from `--input` or stdin when absent.
	data: Option<String>,
	/// Read the encoded bag of cells from this file.
	#[arg(long, short, conflicts_with = "data")]
	input: Option<PathBuf>,
	/// A TL-B schema to try before the bundled ones.
	#[arg(long, short)]
	schema: Option<PathBuf>,
	#[arg(long, short, value_enum, default_value_t = Format::Yaml)]
	format: Format,
	/// How many references deep to keep decoding.
	#[arg(long, default_value_t = Limits::default().max_depth)]
	max_depth: usize,
	/// How many expansion passes to run at most.
	#[arg(long, default_value_t = Limits::default().max_passes)]
	max_passes: usize,
	/// How many cell references to decode in total.
	#[arg(long, default_value_t = Limits::default().max_cells)]
	max_cells: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
	Yaml,
	Json,
	Text,
	/// The raw cell tree of the input.
	Fift,
}

fn main() -> Result<(), anyhow::Error> {
	let opts = Opts::parse();
	pretty_env_logger::init();

	let data = match (&opts.data, &opts.input) {
		(Some(data), _) => data.clone(),
		(None, Some(path)) => std::fs::read_to_string(path)?,
		(None, None) => {
			let mut buf = String::new();
			io::stdin().read_to_string(&mut buf)?;
			buf
		}
	};
	let hint = match &opts.schema {
		Some(path) => SchemaHint::new(std::fs::read_to_string(path)?),
		None => SchemaHint::none(),
	};

	let decoder = Decoder::new()?.with_limits(Limits { max_depth: opts.max_depth, max_passes: opts.max_passes, max_cells: opts.max_cells });
	let decoded = match decoder.decode_input(&data, &hint) {
		Ok(decoded) => decoded,
		Err(e) => anyhow::bail!("{}", e),
	};
	log::debug!("decoded root cell {}", decoded.root.hash_hex());

	print!("{}", render(&decoded, opts.format)?);
	Ok(())
}

fn render(decoded: &Decoded, format: Format) -> Result<String, anyhow::Error> {
	let out = match format {
		Format::Yaml => serde_yaml::to_string(&decoded.sanitized())?,
		Format::Json => format!("{}\n", serde_json::to_string_pretty(&decoded.sanitized())?),
		Format::Text if decoded.is_decoded() => format!("{}\n", decoded.value),
		Format::Text | Format::Fift => decoded.root.to_string(),
	};
	Ok(out)
}
