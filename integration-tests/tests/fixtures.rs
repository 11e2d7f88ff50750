use celldec_common::{Cell, CellBuilder, MsgAddress};
use std::sync::Arc;

/// `0x00000000 "hi"` as a bag of cells with a checksum.
pub const COMMENT_BASE64: &str = "te6cckEBAQEACAAADAAAAABoaeh7Muk=";
pub const COMMENT_HEX: &str = "b5ee9c7241010101000800000c000000006869e87b32e9";

pub fn comment(text: &str) -> Arc<Cell> {
	CellBuilder::new().store_uint(0, 32).unwrap().store_bytes(text.as_bytes()).unwrap().build().unwrap()
}

pub fn excesses(query_id: u64) -> Arc<Cell> {
	CellBuilder::new().store_uint(0xd53276db, 32).unwrap().store_uint(query_id as u128, 64).unwrap().build().unwrap()
}

/// A jetton transfer whose forward payload is `payload`, by reference.
pub fn jetton_transfer(amount: u128, payload: Arc<Cell>) -> Arc<Cell> {
	CellBuilder::new()
		.store_uint(0x0f8a7ea5, 32)
		.unwrap()
		.store_uint(1, 64)
		.unwrap()
		.store_coins(amount)
		.unwrap()
		.store_address(&MsgAddress::std(0, [0x42; 32]))
		.unwrap()
		.store_address(&MsgAddress::std(-1, [0x24; 32]))
		.unwrap()
		.store_bit(false)
		.unwrap()
		.store_coins(10_000_000)
		.unwrap()
		.store_bit(true)
		.unwrap()
		.store_ref(payload)
		.unwrap()
		.build()
		.unwrap()
}

/// `levels` StateInit cells, each holding its child as both `code` and `data`.
pub fn shared_state_init_chain(levels: usize) -> Arc<Cell> {
	let mut cell = CellBuilder::new().store_uint(0, 5).unwrap().build().unwrap();
	for _ in 0..levels {
		cell = CellBuilder::new()
			.store_uint(0b00110, 5)
			.unwrap()
			.store_ref(cell.clone())
			.unwrap()
			.store_ref(cell)
			.unwrap()
			.build()
			.unwrap();
	}
	cell
}

/// A StateInit whose library dictionary forks 16 times into the same subtree.
pub fn state_init_with_shared_library() -> Arc<Cell> {
	let library_root = CellBuilder::new().build().unwrap();
	let mut node = CellBuilder::new()
		.store_uint(0b00, 2)
		.unwrap()
		.store_bit(true)
		.unwrap()
		.store_ref(library_root)
		.unwrap()
		.build()
		.unwrap();
	for _ in 0..15 {
		node = CellBuilder::new()
			.store_uint(0b00, 2)
			.unwrap()
			.store_ref(node.clone())
			.unwrap()
			.store_ref(node)
			.unwrap()
			.build()
			.unwrap();
	}
	// hml_same$11 v:0 n:240 as (#<= 256), then the top fork
	let dict = CellBuilder::new()
		.store_uint(0b110, 3)
		.unwrap()
		.store_uint(240, 9)
		.unwrap()
		.store_ref(node.clone())
		.unwrap()
		.store_ref(node)
		.unwrap()
		.build()
		.unwrap();
	CellBuilder::new().store_uint(0b00001, 5).unwrap().store_ref(dict).unwrap().build().unwrap()
}

/// A bag of cells holding a chain of `len` cells, each referencing the next.
pub fn linear_chain_boc(len: usize) -> Vec<u8> {
	let mut cells = Vec::new();
	for index in 0..len {
		if index + 1 < len {
			cells.extend_from_slice(&[0x01, 0x00]);
			cells.extend_from_slice(&((index + 1) as u16).to_be_bytes());
		} else {
			cells.extend_from_slice(&[0x00, 0x00]);
		}
	}
	let mut boc = vec![0xb5, 0xee, 0x9c, 0x72, 0x02, 0x02];
	boc.extend_from_slice(&(len as u16).to_be_bytes());
	boc.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]);
	boc.extend_from_slice(&(cells.len() as u16).to_be_bytes());
	boc.extend_from_slice(&[0x00, 0x00]);
	boc.extend(cells);
	boc
}
