//! Purpose: Define the stable public API boundary for the das element client.
//! Exports: `Client`, request types, errors, and the toolchain configuration.
//! Role: The only public path to the encoding and execution internals.
//! Invariants: Operation methods stay thin; semantics live in the external tool.

mod client;
mod requests;

pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::exec::{FULL_CLI_ENV, STANDARD_CLI_ENV, Toolchain, Variant};
pub use client::{ApiResult, Client};
pub use requests::{
    AdditionalFile, CreateLibraryRequest, DatabaseOptions, DatabaseType, DeleteScope,
    IngestRequest, MetadataEntry, Platform, PredictOptions, SslMaterial,
};
