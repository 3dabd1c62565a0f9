//! Helpers shared by the rest of the crate: env vars, error messages, database queries.

pub mod db;
pub mod env;
pub mod error;
#[doc(hidden)]
pub mod macros;
