pub mod auth;
pub mod dashboard;
pub mod health;
pub mod members;
pub mod plans;
pub mod subscriptions;
