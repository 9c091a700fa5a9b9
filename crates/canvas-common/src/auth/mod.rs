//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, JwtService, SessionToken};
pub use password::{hash_password, validate_password, verify_password, MIN_PASSWORD_LENGTH};
