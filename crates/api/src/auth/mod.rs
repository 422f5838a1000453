//! Authentication primitives: Argon2id passwords and JWT session tokens.

pub mod jwt;
pub mod password;
