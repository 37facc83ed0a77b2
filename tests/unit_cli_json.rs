#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

#[test]
fn decode_json_reports_snapshot_of_clean_playlist() {
	let json = run_json(&["decode", &fixture("playlist.json"), "--json"]);

	assert_eq!(json["compression"], "none");
	assert_eq!(json["table"], "PlayList");
	assert_eq!(json["value"]["name"], "jay zhou");
	assert_eq!(json["value"]["songNum"], 2);
	assert_eq!(json["value"]["songList"][1]["strList"], json!(["abcd", "efgh", "ijkl"]));
	assert_eq!(json["value"]["songList"][0]["strList"], json!([]));
	assert_eq!(json["value"]["extData"], json!({"a": 999, "b": 1.5}));
	assert!(json.get("retained_blocks").is_none());
}

#[test]
fn decode_json_recovers_nullable_overflow_in_lossy_playlist() {
	let json = run_json(&["decode", &fixture("playlist_lossy.json"), "--json"]);
	let songs = &json["value"]["songList"];

	assert_eq!(songs[0]["duration"], 0, "overflowing duration defaulted");
	assert_eq!(songs[1]["duration"], 180, "real truncated into integer slot");
	assert_eq!(songs[0]["key"], json!([1111, 2222, 3333]));
	assert_eq!(songs[1]["lyric"][1]["time"], 20);
	assert_eq!(json["value"]["extData"]["b"], 1.0);
}

#[test]
fn shallow_release_leaves_nested_blocks() {
	let json = run_json(&["decode", &fixture("playlist.json"), "--json", "--shallow"]);

	let live = json["live_blocks"].as_u64().expect("live block count");
	let retained = json["retained_blocks"].as_u64().expect("retained block count");
	assert!(retained > 0, "nested song strings stay allocated");
	assert!(retained < live);
}

#[test]
fn encode_writes_table_ordered_json() {
	let output = run(&["encode", &fixture("playlist_lossy.json")]);
	assert!(output.status.success(), "encode should succeed");

	let text = String::from_utf8(output.stdout).expect("utf-8 output");
	assert!(text.starts_with(r#"{"name":"jay zhou","creater":"dahuaxia","songNum":2,"songList":["#));
	let json: Value = serde_json::from_str(&text).expect("stdout should be valid json");
	assert_eq!(json["songList"][0]["strNum"], 0);
	assert_eq!(json["songList"][0]["strList"], json!([]));
}

#[test]
fn schema_json_lists_every_table() {
	let json = run_json(&["schema", "--json"]);
	let names: Vec<_> = json.as_array().expect("table list").iter().map(|item| item["name"].clone()).collect();
	assert_eq!(names, [json!("PlayList"), json!("SongInfo"), json!("Lyric"), json!("ExtData")]);

	let json = run_json(&["schema", "--table", "SongInfo", "--json"]);
	let fields = json[0]["fields"].as_array().expect("field list");
	assert_eq!(fields.len(), 13);
	assert_eq!(fields[8]["kind"], "array<Lyric>");
	assert_eq!(fields[8]["count_field"], "lyricNum");
}

#[test]
fn zstd_documents_are_detected() {
	let raw = std::fs::read(fixture_path("playlist.json")).expect("fixture reads");
	let packed = zstd::encode_all(&raw[..], 3).expect("compresses");
	let path = std::env::temp_dir().join(format!("structjson-playlist-{}.json.zst", std::process::id()));
	std::fs::write(&path, packed).expect("temp file writes");

	let json = run_json(&["decode", &path.display().to_string(), "--json"]);
	let _ = std::fs::remove_file(&path);
	assert_eq!(json["compression"], "zstd");
	assert_eq!(json["value"]["songNum"], 2);
}

#[test]
fn hard_failure_exits_non_zero_with_field_name() {
	let path = std::env::temp_dir().join(format!("structjson-no-name-{}.json", std::process::id()));
	std::fs::write(&path, r#"{"creater":"x","songList":[]}"#).expect("temp file writes");

	let output = run(&["decode", &path.display().to_string()]);
	let _ = std::fs::remove_file(&path);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("missing field name"), "stderr was: {stderr}");
}

#[test]
fn oversized_document_is_refused() {
	let output = run(&["decode", &fixture("playlist.json"), "--max-bytes", "16"]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("document exceeded limit 16 bytes"), "stderr was: {stderr}");
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_structjson")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"structjson command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn fixture(name: &str) -> String {
	fixture_path(name).display().to_string()
}

fn fixture_path(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}
