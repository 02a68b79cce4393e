// Service exports
pub mod backend;
pub mod cache;

pub use backend::{BackendClient, BackendError, BackendTables};
pub use cache::{CacheError, CacheKey, CacheStats, PoolCache};
