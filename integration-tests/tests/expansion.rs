use crate::fixtures::{comment, jetton_transfer};
use celldec::{Decoder, SchemaHint, Value};
use celldec_common::{bits, boc, Dictionary};

#[test]
fn jetton_payload_reaches_a_fixed_point() {
	let _ = pretty_env_logger::try_init();
	let payload = comment("thanks");
	let root = jetton_transfer(1_000_000, payload.clone());
	let decoder = Decoder::new().unwrap();
	let hint = SchemaHint::none();

	let value = decoder.decode_fully(&root, &hint);
	assert_eq!(value.kind(), Some("transfer"));
	assert_eq!(value.field("amount"), Some(&Value::u64(1_000_000)));
	assert_eq!(value.field("forward_ton_amount"), Some(&Value::u64(10_000_000)));

	let Some(Value::Expanded(forward)) = value.field("forward_payload") else {
		panic!("forward payload was not expanded: {:?}", value.field("forward_payload"));
	};
	assert_eq!(forward.parsed, Value::Comment("thanks".into()));

	// `data` carries the original cell
	let roots = boc::deserialize(&hex::decode(&forward.data).unwrap()).unwrap();
	assert_eq!(roots, vec![payload]);

	let again = decoder.expand(&value, &hint);
	assert!(!again.has_changes());
	assert!(std::ptr::eq(again.value(), &value));
}

#[test]
fn expanding_decoded_values_is_the_identity() {
	let decoder = Decoder::new().unwrap();
	let value = Value::structured("plain", vec![("n".into(), Value::u64(3)), ("s".into(), Value::string("x"))]);
	let expansion = decoder.expand(&value, &SchemaHint::none());
	assert!(!expansion.has_changes());
	assert!(std::ptr::eq(expansion.value(), &value));
}

#[test]
fn dictionaries_flatten_once() {
	let decoder = Decoder::new().unwrap();
	let hint = SchemaHint::none();
	let dict = Dictionary::new(16, vec![(bits::from_bytes(&[0x01, 0x00], 16), Value::Cell(comment("a")))]);
	let value = Value::Dictionary(dict);

	let first = decoder.expand(&value, &hint);
	assert!(first.has_changes());
	let Value::Entries(entries) = first.value() else { panic!("expected entries, got {:?}", first.value()) };
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].0, "256");
	assert!(matches!(&entries[0].1, Value::Expanded(e) if e.parsed == Value::Comment("a".into())));

	assert!(!decoder.expand(first.value(), &hint).has_changes());
}
