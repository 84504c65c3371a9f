//! Cache domain - Generic caching abstraction layer

mod clock;
mod key;
mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{
    escape_chars, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator, KeyPattern,
};
pub use repository::Cache;

#[cfg(test)]
pub use repository::mock::MockCache;
