//! Purpose: Client library for the das element CLI executables.
//! Exports: `api` (client surface) and `core` (encoding, execution, errors).
//! Role: Marshals typed calls into CLI argument vectors, runs the external
//! tool synchronously, and decodes its JSON output.
//! Invariants: All domain semantics (database, transcoding, prediction) are
//! owned by the external executable; this crate never reimplements them.
//! Invariants: Invocations either fully succeed with decoded data or fail
//! with one classified error; no partial results.
pub mod api;
pub mod core;
