//! PostgreSQL User Directory

use chrono::{DateTime, Utc};
use kernel::id::Id;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::{NewUser, User, UserAssociations};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_associations(&self, user_id: Uuid) -> AuthResult<UserAssociations> {
        let store_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT store_id FROM stores WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let favorite_product_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT product_id FROM user_favorites WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let order_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT order_id FROM orders WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserAssociations {
            store_ids: store_ids.into_iter().map(Id::from_uuid).collect(),
            favorite_product_ids: favorite_product_ids.into_iter().map(Id::from_uuid).collect(),
            order_ids: order_ids.into_iter().map(Id::from_uuid).collect(),
        })
    }

    async fn hydrate(&self, row: Option<UserRow>) -> AuthResult<Option<User>> {
        let Some(row) = row else {
            return Ok(None);
        };
        let associations = self.load_associations(row.user_id).await?;
        row.into_user(associations).map(Some)
    }
}

impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                name,
                picture,
                password_hash,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                name,
                picture,
                password_hash,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                user_id,
                email,
                name,
                picture,
                password_hash
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING
                user_id,
                email,
                name,
                picture,
                password_hash,
                created_at,
                updated_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.picture)
        .bind(user.password_hash.as_ref().map(|hash| hash.as_phc_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailTaken,
            other => AuthError::Database(other),
        })?;

        // A new user owns nothing yet
        row.into_user(UserAssociations::default())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    name: String,
    picture: Option<String>,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, associations: UserAssociations) -> AuthResult<User> {
        let password_hash = self
            .password_hash
            .map(UserPassword::from_phc_string)
            .transpose()?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            name: self.name,
            picture: self.picture,
            password_hash,
            associations,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
