//! Shared primitives for the strata table catalog.
//!
//! This crate holds the pieces every other strata crate builds on:
//!
//! - [`table`]: validated fully-qualified table names
//! - [`id`]: ULID-backed typed identifiers
//! - [`error`]: the core error type and result alias
//! - [`observability`]: logging setup and span constructors

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod observability;
pub mod table;

pub use error::{Error, Result};
pub use id::EdgeId;
pub use table::{TableName, TableNameError};
