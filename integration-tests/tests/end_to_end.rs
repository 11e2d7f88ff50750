use crate::fixtures::{COMMENT_BASE64, COMMENT_HEX};
use base64::{engine::general_purpose::STANDARD, Engine};
use celldec::{Decoder, Error, SchemaHint};
use celldec_common::CellBuilder;
use serde_json::json;

#[test]
fn comment_from_base64() {
	let _ = pretty_env_logger::try_init();
	let decoder = Decoder::new().unwrap();
	let decoded = decoder.decode_input(COMMENT_BASE64, &SchemaHint::none()).unwrap();
	assert_eq!(decoded.sanitized(), json!({ "kind": "comment", "text": "hi" }));
}

#[test]
fn comment_regardless_of_hint() {
	let decoder = Decoder::new().unwrap();
	let hints = ["", "this is { not a schema", "other#deadbeef x:uint8 = Other;"];
	for hint in hints {
		let decoded = decoder.decode_input(COMMENT_BASE64, &SchemaHint::from(hint)).unwrap();
		assert_eq!(decoded.sanitized(), json!({ "kind": "comment", "text": "hi" }), "hint {:?}", hint);
	}
}

#[test]
fn hex_input_decodes_the_same() {
	let decoder = Decoder::new().unwrap();
	let from_hex = decoder.decode_input(COMMENT_HEX, &SchemaHint::none()).unwrap();
	let from_base64 = decoder.decode_input(COMMENT_BASE64, &SchemaHint::none()).unwrap();
	assert_eq!(from_hex, from_base64);
}

#[test]
fn malformed_input_is_a_user_facing_error() {
	let decoder = Decoder::new().unwrap();
	let err = decoder.decode_input("not-a-cell", &SchemaHint::none()).unwrap_err();
	assert!(matches!(err, Error::InvalidInput(_)));
	assert!(err.to_string().starts_with("Could not read the input as a cell"));
}

#[test]
fn undecodable_cell_is_shown_raw() {
	let cell = CellBuilder::new().store_uint(0b101, 3).unwrap().build().unwrap();
	let decoder = Decoder::new().unwrap();
	let input = STANDARD.encode(cell.to_boc());
	let decoded = decoder.decode_input(&input, &SchemaHint::none()).unwrap();
	assert!(!decoded.is_decoded());
	assert_eq!(decoded.root, cell);
	assert_eq!(decoded.sanitized(), serde_json::Value::String(cell.to_boc_hex()));
}
