//! Cache infrastructure - Cache implementations

mod factory;
mod in_memory;
mod redis;
mod response_cache;

pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use redis::{RedisCache, RedisCacheConfig};
pub use response_cache::{CacheStats, Lookup, ResponseCache};
