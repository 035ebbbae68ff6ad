pub mod claims;
pub mod clock;
pub mod error;
pub mod factory;
pub mod identity;
pub mod issuer;
pub mod signing;
pub mod verifier;

pub use claims::{Claims, Principal, Role};
pub use error::AuthError;
pub use issuer::{Credentials, IssueError, IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;
