/*
 * Responsibility
 * - Public interface of the middleware layer
 * - auth::access (bearer gate), cors, http, security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
