//! Admin authentication: JWT access tokens and Argon2 password hashes.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;
