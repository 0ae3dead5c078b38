/*
 * Responsibility
 * - Public surface of v1 (re-export of routes())
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;
