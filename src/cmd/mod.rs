/// Document decode command.
pub mod decode;
/// Decode-then-encode command.
pub mod encode;
/// Built-in playlist tables.
pub mod playlist;
/// Table layout inspection command.
pub mod schema;
/// Shared output helpers.
pub mod util;
