/*
 * Responsibility
 * - Public entry point of the HTTP API (re-exports routes())
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
