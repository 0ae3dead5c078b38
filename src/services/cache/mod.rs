pub mod client;
pub mod expiring;
pub mod memory;
pub mod valkey;

pub use client::{CacheClient, CacheError};
pub use expiring::{ExpiringStore, StoreError};
pub use memory::MemoryClient;
pub use valkey::ValkeyClient;

#[cfg(test)]
pub mod down;
