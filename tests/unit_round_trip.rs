#![allow(missing_docs)]

use serde_json::json;
use structjson::reflect::{
	DecodeOptions, ELEM_F64, ELEM_I16, ErrorKind, FieldDesc, Heap, Record, Table, Value, decode_with, encode_value, release, snapshot,
};

static READING: Table = Table {
	name: "Reading",
	size: 24,
	fields: &[FieldDesc::string("sensor", 0), FieldDesc::real("value", 8), FieldDesc::bool("ok", 16, 1).nullable()],
};

static STATION: Table = Table {
	name: "Station",
	size: 64,
	fields: &[
		FieldDesc::string("id", 0),
		FieldDesc::int("elevation", 8, 2),
		FieldDesc::int("readings_len", 12, 4),
		FieldDesc::array("readings", 16, &READING, "readings_len"),
		FieldDesc::int("samples_len", 24, 2),
		FieldDesc::array("samples", 32, &ELEM_F64, "samples_len").nullable(),
		FieldDesc::int("codes_len", 40, 1),
		FieldDesc::array("codes", 48, &ELEM_I16, "codes_len").nullable(),
		FieldDesc::object("last", 56, &LAST).nullable(),
	],
};

static LAST: Table = Table {
	name: "Last",
	size: 8,
	fields: &[FieldDesc::int("hour", 0, 4), FieldDesc::int("minute", 4, 4)],
};

#[test]
fn tables_validate() {
	STATION.validate().expect("station validates");
	READING.validate().expect("reading validates");
}

#[test]
fn decode_encode_decode_is_stable() {
	let source = json!({
		"id": "st-7",
		"elevation": -120,
		"readings": [
			{"sensor": "temp", "value": 21.5, "ok": true},
			{"sensor": "wind", "value": 3}
		],
		"samples": [0.25, 1, -4.5],
		"codes": [1, -2, 300],
		"last": {"hour": 23, "minute": 59}
	});

	let mut first = Record::new(&STATION);
	first.decode_value(&source).expect("first decode");
	let encoded = first.encode_value().expect("encode");

	let mut second = Record::new(&STATION);
	second.decode_value(&encoded).expect("second decode");
	assert_eq!(first.snapshot().expect("snapshot"), second.snapshot().expect("snapshot"));
	assert_eq!(encoded["readings"][1], json!({"sensor": "wind", "value": 3.0, "ok": false}));
	assert_eq!(encoded["samples_len"], 3);
	assert_eq!(encoded["codes"], json!([1, -2, 300]));
}

#[test]
fn element_overflow_is_skipped_not_fatal() {
	let mut record = Record::new(&STATION);
	record
		.decode_value(&json!({"id": "x", "elevation": 1, "readings": [{"sensor": "s", "value": 1}], "codes": [1, 40000, 2]}))
		.expect("decode succeeds");

	let snap = record.snapshot().expect("snapshot");
	let codes: Vec<_> = snap.get("codes").and_then(Value::as_array).expect("codes").iter().filter_map(Value::as_i64).collect();
	assert_eq!(codes, [1, 2]);
	assert_eq!(snap.get("codes_len"), Some(&Value::I64(2)));
}

#[test]
fn required_overflow_aborts_with_field_and_kind() {
	let mut record = Record::new(&STATION);
	let err = record
		.decode_value(&json!({"id": "x", "elevation": 40000, "readings": [{"sensor": "s", "value": 1}]}))
		.expect_err("elevation does not fit i16");
	assert_eq!(err.kind(), ErrorKind::Overflow);
	assert_eq!(err.field(), Some("elevation"));
	assert_eq!(err.kind().code(), 5);
	assert_eq!(record.heap().live_blocks(), 1, "id decoded before the failure");
}

#[test]
fn free_functions_share_one_heap_across_records() {
	let mut heap = Heap::new();
	let mut left = vec![0_u8; STATION.size];
	let mut right = vec![0_u8; STATION.size];
	let doc = json!({"id": "a", "elevation": 0, "readings": [{"sensor": "s", "value": 0}]});

	decode_with(&doc, &mut left, &mut heap, &STATION, &DecodeOptions::default()).expect("left decodes");
	decode_with(&doc, &mut right, &mut heap, &STATION, &DecodeOptions::default()).expect("right decodes");
	assert_eq!(snapshot(&left, &heap, &STATION).expect("left"), snapshot(&right, &heap, &STATION).expect("right"));

	release(&mut left, &mut heap, &STATION);
	assert_eq!(encode_value(&right, &heap, &STATION).expect("right still encodes")["id"], "a");
	release(&mut right, &mut heap, &STATION);
	assert_eq!(heap.live_blocks(), 0);
}
