pub mod client;
pub mod tmdb;
mod wire;

pub use client::{CatalogClient, RemoteFetchError};
pub use tmdb::{TmdbClient, TmdbConfig};

#[cfg(test)]
pub mod fake;
