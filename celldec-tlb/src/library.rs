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

//! The bundled library: schemas for message bodies and structures common enough that every
//! decoder should recognise them without being told.

use crate::{
	error::{SchemaError, TlbError},
	schema::Schema,
};
use celldec_common::{Cell, Value};

/// Constructor name of the generic text comment payload.
pub const TEXT_COMMENT: &str = "text_comment";

const BUNDLED_SCHEMA: &str = r#"
// Jettons
transfer#0f8a7ea5 query_id:uint64 amount:(VarUInteger 16) destination:MsgAddress
	response_destination:MsgAddress custom_payload:(Maybe ^Cell) forward_ton_amount:(VarUInteger 16)
	forward_payload:(Either Cell ^Cell) = JettonTransfer;
internal_transfer#178d4519 query_id:uint64 amount:(VarUInteger 16) from:MsgAddress
	response_address:MsgAddress forward_ton_amount:(VarUInteger 16)
	forward_payload:(Either Cell ^Cell) = JettonInternalTransfer;
transfer_notification#7362d09c query_id:uint64 amount:(VarUInteger 16) sender:MsgAddress
	forward_payload:(Either Cell ^Cell) = JettonTransferNotification;
burn#595f07bc query_id:uint64 amount:(VarUInteger 16) response_destination:MsgAddress
	custom_payload:(Maybe ^Cell) = JettonBurn;
excesses#d53276db query_id:uint64 = Excesses;

// NFTs
nft_transfer#5fcc3d14 query_id:uint64 new_owner:MsgAddress response_destination:MsgAddress
	custom_payload:(Maybe ^Cell) forward_amount:(VarUInteger 16)
	forward_payload:(Either Cell ^Cell) = NftTransfer;
ownership_assigned#05138d91 query_id:uint64 prev_owner:MsgAddress
	forward_payload:(Either Cell ^Cell) = NftOwnershipAssigned;
get_static_data#2fcb26a2 query_id:uint64 = GetStaticData;
report_static_data#8b771735 query_id:uint64 index:uint256 collection:MsgAddress = ReportStaticData;

// Messages
tick_tock$_ tick:Bool tock:Bool = TickTock;
simple_lib$_ public:Bool root:^Cell = SimpleLib;
_ split_depth:(Maybe (## 5)) special:(Maybe TickTock) code:(Maybe ^Cell) data:(Maybe ^Cell)
	library:(HashmapE 256 SimpleLib) = StateInit;

extra_currencies$_ dict:(HashmapE 32 (VarUInteger 32)) = ExtraCurrencyCollection;
currencies$_ grams:Grams other:ExtraCurrencyCollection = CurrencyCollection;

int_msg_info$0 ihr_disabled:Bool bounce:Bool bounced:Bool src:MsgAddressInt dest:MsgAddressInt
	value:CurrencyCollection ihr_fee:Grams fwd_fee:Grams created_lt:uint64 created_at:uint32 = CommonMsgInfo;
ext_in_msg_info$10 src:MsgAddressExt dest:MsgAddressInt import_fee:Grams = CommonMsgInfo;
ext_out_msg_info$11 src:MsgAddressInt dest:MsgAddressExt created_lt:uint64 created_at:uint32 = CommonMsgInfo;

message$_ info:CommonMsgInfo init:(Maybe (Either StateInit ^StateInit)) body:(Either Cell ^Cell) = Message;

// Only proves the shape; the opcode is checked by whoever interprets the result.
text_comment$_ op:uint32 text:Text = TextComment;
"#;

/// Types the bundled library tries, in order.
const BUNDLED_ROOTS: &[&str] = &[
	"JettonTransfer",
	"JettonInternalTransfer",
	"JettonTransferNotification",
	"JettonBurn",
	"Excesses",
	"NftTransfer",
	"NftOwnershipAssigned",
	"GetStaticData",
	"ReportStaticData",
	"Message",
	"StateInit",
	"TextComment",
];

/// A schema together with the ordered list of types worth trying as a cell's root.
#[derive(Debug, Clone)]
pub struct Library {
	schema: Schema,
	roots: Vec<String>,
}

impl Library {
	/// The library of well-known schemas.
	pub fn bundled() -> Result<Self, SchemaError> {
		Self::new(Schema::compile(BUNDLED_SCHEMA)?, BUNDLED_ROOTS.iter().map(|s| s.to_string()).collect())
	}

	/// A library over `schema` trying `roots` in order. Every root must be declared.
	pub fn new(schema: Schema, roots: Vec<String>) -> Result<Self, SchemaError> {
		if let Some(missing) = roots.iter().find(|root| schema.get(root).is_none()) {
			return Err(SchemaError::UnknownType(missing.clone()));
		}
		Ok(Library { schema, roots })
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn roots(&self) -> &[String] {
		&self.roots
	}

	/// Read `cell` as the first root type that consumes it completely.
	pub fn deserialize(&self, cell: &Cell) -> Result<Value, TlbError> {
		for root in &self.roots {
			match self.schema.deserialize_as(cell, root) {
				Ok(value) => {
					log::trace!("bundled type `{}` matched", root);
					return Ok(value);
				}
				Err(e) => log::trace!("bundled type `{}` rejected: {}", root, e),
			}
		}
		Err(TlbError::NoMatch)
	}
}
