//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::user::User;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query string Google appends to the callback URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declines consent
    pub error: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub store_ids: Vec<Uuid>,
    pub favorite_product_ids: Vec<Uuid>,
    pub order_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let associations = &user.associations;
        Self {
            id: *user.user_id.as_uuid(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            store_ids: associations.store_ids.iter().map(|id| *id.as_uuid()).collect(),
            favorite_product_ids: associations
                .favorite_product_ids
                .iter()
                .map(|id| *id.as_uuid())
                .collect(),
            order_ids: associations.order_ids.iter().map(|id| *id.as_uuid()).collect(),
            created_at: user.created_at,
        }
    }
}

/// Body of login, register and refresh. The refresh token is delivered
/// only as a cookie.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
}
