//! Entity Module

pub mod external_identity;
pub mod user;
