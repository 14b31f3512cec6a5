//! Purpose: Define the public Rust API boundary for mvnprobe.
//! Exports: Lookup client and coordinate types, stub writer, error types.
//! Role: Public, additive-only surface used by the CLI and integration tests.
//! Invariants: The lookup and the stub writer share nothing but the error type.

mod search;
mod stub;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use search::{
    Coordinate, Coordinates, MAVEN_CENTRAL_ENDPOINT, SEARCH_ROWS, SearchClient,
};
pub use stub::{STUB_FILE_NAME, STUB_TEMPLATE, write_stub};
