pub mod envelope;
pub mod login;
pub mod resources;
