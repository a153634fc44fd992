//! Database repository for users.

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::users::{UserCreateDBRequest, UserDBResponse, UserFilter, UserUpdateDBRequest},
    },
    types::{UserId, abbrev_uuid},
};

const USER_COLUMNS: &str = "user_id, name, email, password_hash, created_at";

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            "INSERT INTO users (user_id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, user_id LIMIT $1 OFFSET $2"
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash)
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.name)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look a user up by email. Emails are stored lowercased, so the lookup
    /// normalizes its argument the same way.
    #[instrument(skip(self, email), err)]
    pub async fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::db::errors::DbError;
    use sqlx::PgPool;

    fn create_request(name: &str, email: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@x.com");

        let fetched = repo.get_by_id(user.user_id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, user.user_id);
        assert_eq!(fetched.created_at, user.created_at);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_user_by_email_ignores_case(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let created = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();

        let found = repo.get_user_by_email("  ANN@x.com ").await.unwrap().unwrap();
        assert_eq!(found.user_id, created.user_id);
        assert!(repo.get_user_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        let err = repo.create(&create_request("Other Ann", "ann@x.com")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }), "got {err:?}");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_keeps_unset_columns(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        let updated = repo
            .update(
                user.user_id,
                &UserUpdateDBRequest {
                    name: Some("Annie".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Annie");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_and_delete(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let ann = repo.create(&create_request("Ann", "ann@x.com")).await.unwrap();
        repo.create(&create_request("Bob", "bob@x.com")).await.unwrap();

        assert_eq!(repo.list(&UserFilter::new(0, 10)).await.unwrap().len(), 2);
        assert_eq!(repo.list(&UserFilter::new(0, 1)).await.unwrap().len(), 1);

        assert!(repo.delete(ann.user_id).await.unwrap());
        assert!(!repo.delete(ann.user_id).await.unwrap());
        assert_eq!(repo.list(&UserFilter::new(0, 10)).await.unwrap().len(), 1);
    }
}
