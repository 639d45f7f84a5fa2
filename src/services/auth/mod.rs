pub mod claims;
pub mod password;
pub mod token_service;

pub use password::{Argon2Hasher, PasswordHasher, hash_password, verify_password};
pub use token_service::{TokenError, TokenService};
