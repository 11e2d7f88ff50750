use crate::fixtures::{comment, excesses};
use celldec::{Decoder, Event, Recorder, SchemaHint, Value};
use celldec_common::{bits, Cell};
use std::sync::Arc;

fn failed_strategies(recorder: &Recorder) -> Vec<&'static str> {
	recorder
		.events()
		.into_iter()
		.filter_map(|e| match e {
			Event::StrategyFailed { strategy, .. } => Some(strategy),
			_ => None,
		})
		.collect()
}

#[test]
fn bundled_library_without_hint() {
	let decoder = Decoder::new().unwrap();
	let value = decoder.decode_fully(&excesses(9), &SchemaHint::none());
	assert_eq!(value.kind(), Some("excesses"));
	assert_eq!(value.field("query_id"), Some(&Value::u64(9)));
}

#[test]
fn hint_takes_priority_over_the_library() {
	let hint = SchemaHint::from("my_excesses#d53276db q:uint64 = Mine;");
	let decoder = Decoder::new().unwrap();
	let value = decoder.decode_fully(&excesses(9), &hint);
	assert_eq!(value.kind(), Some("my_excesses"));
	assert_eq!(value.field("q"), Some(&Value::u64(9)));
}

#[test]
fn broken_hint_degrades_to_the_library() {
	let recorder = Recorder::new();
	let decoder = Decoder::new().unwrap().with_diagnostics(recorder.clone());
	let value = decoder.decode_fully(&comment("hi"), &SchemaHint::from("broken {"));
	assert_eq!(value, Value::Comment("hi".into()));
	assert_eq!(failed_strategies(&recorder), ["hinted_schema"]);
}

#[test]
fn exotic_cells_fall_back_to_block_layouts() {
	let root = comment("proved");
	let mut data = bits::from_bytes(&[3], 8);
	data.extend_from_bitslice(&bits::from_bytes(root.hash(), 256));
	data.extend_from_bitslice(&bits::from_bytes(&[0, 0], 16));
	let proof = Arc::new(Cell::exotic(data, vec![root.clone()], 0).unwrap());

	let recorder = Recorder::new();
	let decoder = Decoder::new().unwrap().with_diagnostics(recorder.clone());
	let value = decoder.decode_fully(&proof, &SchemaHint::none());
	assert_eq!(value.kind(), Some("merkle_proof"));
	assert_eq!(failed_strategies(&recorder), ["bundled_library"]);

	// the proved root is decoded on a later pass
	match value.field("virtual_root") {
		Some(Value::Expanded(expanded)) => {
			assert_eq!(expanded.cell, root);
			assert_eq!(expanded.parsed, Value::Comment("proved".into()));
		}
		other => panic!("expected an expanded root, got {:?}", other),
	}
}

#[test]
fn nothing_matches() {
	let cell = Arc::new(Cell::new(bits::from_bytes(&[0xff, 0xff, 0xff, 0xff, 0xe0], 35), Vec::new()).unwrap());
	let recorder = Recorder::new();
	let decoder = Decoder::new().unwrap().with_diagnostics(recorder.clone());
	assert_eq!(decoder.decode(&cell, &SchemaHint::none()), None);
	assert_eq!(failed_strategies(&recorder), ["bundled_library", "block_layouts"]);
}
