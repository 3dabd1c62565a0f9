//! Database-related helpers.

pub mod paginate;
pub mod search;
