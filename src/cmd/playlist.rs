use structjson::reflect::{ELEM_I32, ELEM_STRING, FieldDesc, Table};

/// One timed lyric line.
pub static LYRIC: Table = Table {
	name: "Lyric",
	size: 16,
	fields: &[FieldDesc::int("time", 0, 4), FieldDesc::string("text", 8)],
};

/// One song with its lyrics, keys and free-form strings.
pub static SONG_INFO: Table = Table {
	name: "SongInfo",
	size: 96,
	fields: &[
		FieldDesc::string("songName", 0),
		FieldDesc::string("signerName", 8).nullable(),
		FieldDesc::string("albumName", 16).nullable(),
		FieldDesc::string("url", 24).nullable(),
		FieldDesc::int("duration", 32, 4).nullable(),
		FieldDesc::bool("paid", 36, 4).nullable(),
		FieldDesc::real("price", 40).nullable(),
		FieldDesc::int("lyricNum", 48, 8),
		FieldDesc::array("lyric", 56, &LYRIC, "lyricNum").nullable(),
		FieldDesc::int("keyNum", 64, 8),
		FieldDesc::array("key", 72, &ELEM_I32, "keyNum").nullable(),
		FieldDesc::int("strNum", 80, 8),
		FieldDesc::array("strList", 88, &ELEM_STRING, "strNum").nullable(),
		FieldDesc::END,
	],
};

/// Extra data embedded by value.
pub static EXT_DATA: Table = Table {
	name: "ExtData",
	size: 16,
	fields: &[FieldDesc::int("a", 0, 4), FieldDesc::real("b", 8)],
};

/// Playlist root record.
pub static PLAY_LIST: Table = Table {
	name: "PlayList",
	size: 48,
	fields: &[
		FieldDesc::string("name", 0),
		FieldDesc::string("creater", 8).nullable(),
		FieldDesc::int("songNum", 16, 8),
		FieldDesc::array("songList", 24, &SONG_INFO, "songNum"),
		FieldDesc::object("extData", 32, &EXT_DATA).nullable(),
	],
};

/// Every table reachable from [`PLAY_LIST`], root first.
pub static ALL: [&Table; 4] = [&PLAY_LIST, &SONG_INFO, &LYRIC, &EXT_DATA];
