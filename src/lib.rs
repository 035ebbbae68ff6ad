//! Stateless bearer-token authentication for the gym management API.
//!
//! `POST /api/auth/login` issues HS256 session tokens; every other `/api` route sits behind a
//! gate that verifies them and hands the decoded `Principal` to the handler.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
