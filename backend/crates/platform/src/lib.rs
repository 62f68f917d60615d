//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no business meaning:
//! - Cookie construction and removal (typed `Set-Cookie` values)
//! - Password policy and Argon2id hashing
//! - Secure randomness

pub mod cookie;
pub mod crypto;
pub mod password;
