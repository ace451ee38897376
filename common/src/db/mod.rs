// Database layer module: MySQL connection pool and repositories

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod pool;
pub mod repositories;

pub use pool::DbPool;
pub use repositories::{PostStore, RecordStore, UserStore};
