//! I/O adapters: the price API and the on-disk cache.

pub mod cache;
pub mod wiki;

pub use cache::{default_cache_path, CacheError, CacheStore, JsonFileCache};
pub use wiki::{PriceClient, PriceClientError};
