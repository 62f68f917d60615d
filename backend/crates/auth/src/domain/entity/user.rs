//! User Entity
//!
//! A storefront account. Created by registration (with a password) or by the
//! first OAuth login (without one). Email is unique across all users.

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId, StoreId};

use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub name: String,
    pub picture: Option<String>,
    /// `None` for accounts created through an OAuth provider
    pub password_hash: Option<UserPassword>,
    pub associations: UserAssociations,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Ids of records owned by the user, derived from the store tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAssociations {
    pub store_ids: Vec<StoreId>,
    pub favorite_product_ids: Vec<ProductId>,
    pub order_ids: Vec<OrderId>,
}

/// Creation request handed to the user directory
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub picture: Option<String>,
    pub password_hash: Option<UserPassword>,
}

impl NewUser {
    /// Password account; the name defaults to the email local part
    pub fn with_password(email: Email, name: Option<String>, password_hash: UserPassword) -> Self {
        let name = name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.local_part().to_string());

        Self {
            email,
            name,
            picture: None,
            password_hash: Some(password_hash),
        }
    }

    /// Materialize with a fresh id; used by directories that do not assign ids themselves
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            user_id: UserId::new(),
            email: self.email,
            name: self.name,
            picture: self.picture,
            password_hash: self.password_hash,
            associations: UserAssociations::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
