//! Table-driven reflection between JSON value trees and byte-laid-out records.

/// Metadata tables, decoder, encoder, visitor and default filler.
pub mod reflect;
