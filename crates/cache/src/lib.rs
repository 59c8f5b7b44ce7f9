//! Redis-backed caches used by the fraud detector.
//!
//! - velocity counters per (user, location) with a one-minute expiry
//! - per-user spend statistics (10 minutes)
//! - risk engine verdicts per (user, merchant) (5 minutes)

pub mod codec;
pub mod keys;
mod redis_cache;

pub use redis_cache::RedisCache;
