//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One pool per process, created at startup and passed down
//! - One SQL statement per repository call, auto-committed
//! - Every dynamic value is a bound parameter
//! - "No rows" is reported as `DbError::NotFound`, never as a default value

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
pub use schema::ensure_schema;
