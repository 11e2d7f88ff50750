use crate::fixtures::{comment, jetton_transfer};
use celldec::{sanitize, sanitize_json, Decoder, SchemaHint, MAX_SAFE_INTEGER};
use serde_json::json;

#[test]
fn decoded_transfer_is_plain_json() {
	let amount = 10u128.pow(24);
	let root = jetton_transfer(amount, comment("gm"));
	let decoder = Decoder::new().unwrap();
	let json = sanitize(&decoder.decode_fully(&root, &SchemaHint::none()));

	assert_eq!(json["kind"], json!("transfer"));
	assert_eq!(json["amount"], json!("1000000000000000000000000"));
	assert_eq!(json["forward_ton_amount"], json!(10_000_000));
	assert_eq!(json["custom_payload"], json!(null));
	assert_eq!(json["destination"], json!(format!("0:{}", "42".repeat(32))));
	assert_eq!(json["forward_payload"]["parsed"], json!({ "kind": "comment", "text": "gm" }));
	assert_eq!(json["forward_payload"]["data"], json!(comment("gm").to_boc_hex()));
}

#[test]
fn sanitizing_is_idempotent() {
	let root = jetton_transfer(u64::MAX as u128, comment("again"));
	let decoder = Decoder::new().unwrap();
	let once = sanitize(&decoder.decode_fully(&root, &SchemaHint::none()));
	assert_eq!(once["amount"], json!(u64::MAX.to_string()));
	assert_eq!(sanitize_json(&once), once);
}

#[test]
fn safe_integer_boundary() {
	assert_eq!(sanitize_json(&json!(MAX_SAFE_INTEGER)), json!(MAX_SAFE_INTEGER));
	assert_eq!(sanitize_json(&json!(MAX_SAFE_INTEGER + 1)), json!("9007199254740992"));
	assert_eq!(sanitize_json(&json!(-(MAX_SAFE_INTEGER as i64) - 1)), json!("-9007199254740992"));
	assert_eq!(sanitize_json(&json!(1.5)), json!(1.5));
}
