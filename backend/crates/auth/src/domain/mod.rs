//! Domain Layer
//!
//! Entities, value objects, and the collaborator traits the use cases are
//! generic over.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

pub use entity::{
    external_identity::ExternalIdentity,
    user::{NewUser, User, UserAssociations},
};
pub use repository::{OAuthProvider, UserDirectory};
pub use token::{TokenClaims, TokenCodec, TokenPair};
