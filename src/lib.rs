//! Purpose: Library crate backing the `mvnprobe` CLI and its tests.
//! Exports: `api` (coordinate lookup, stub writer, errors).
//! Role: Two independent single-shot operations with no shared state.
//! Invariants: Operations take explicit inputs and never touch global state.
pub mod api;
mod core;
