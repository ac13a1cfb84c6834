//! # Vela Discovery
//!
//! Client-side service discovery suppliers for Vela: the supplier
//! contract, a cache store abstraction with in-memory and Redis
//! implementations, and a caching supplier that decorates any other
//! supplier with cache-aside lookups.

pub mod cache;
pub mod caching;
pub mod fixed;
pub mod supplier;

pub use cache::*;
pub use caching::*;
pub use fixed::*;
pub use supplier::*;
