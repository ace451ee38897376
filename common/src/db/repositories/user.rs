// User repository implementation

use crate::db::repositories::UserStore;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{encode_json_column, NewUser, User, UserChanges, UserRow};
use async_trait::async_trait;
use sqlx::mysql::MySqlQueryResult;
use tracing::instrument;

const SELECT_USERS: &str = r#"
    SELECT id, name, username, email, address, phone, website, company
    FROM users
"#;

/// Repository for user-related database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, user: &NewUser) -> Result<MySqlQueryResult, DatabaseError> {
        let address = encode_json_column(user.address.as_ref())?;
        let company = encode_json_column(user.company.as_ref())?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, username, email, address, phone, website, company)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(address)
        .bind(&user.phone)
        .bind(&user.website)
        .bind(company)
        .execute(self.pool.pool())
        .await?;

        Ok(result)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USERS} ORDER BY id"))
            .fetch_all(self.pool.pool())
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USERS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USERS} WHERE email = ? ORDER BY id LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(self.pool.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let result = self.insert(user).await?;

        // A NULL id lets AUTO_INCREMENT choose one
        let id = match user.id {
            Some(id) => id,
            None => i64::try_from(result.last_insert_id()).map_err(|_| {
                DatabaseError::QueryFailed("Inserted user id out of range".to_string())
            })?,
        };

        let created = self.find_by_id(id).await?.ok_or_else(|| {
            DatabaseError::NotFound(format!("User {} vanished after insert", id))
        })?;

        tracing::info!(user_id = id, "User created");
        Ok(created)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<User, DatabaseError> {
        let address = encode_json_column(changes.address.as_ref())?;
        let company = encode_json_column(changes.company.as_ref())?;

        sqlx::query(
            r#"
            UPDATE users
            SET name = ?,
                username = ?,
                email = ?,
                phone = ?,
                website = ?,
                address = COALESCE(?, address),
                company = COALESCE(?, company)
            WHERE id = ?
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.website)
        .bind(address)
        .bind(company)
        .bind(id)
        .execute(self.pool.pool())
        .await?;

        // MySQL reports zero affected rows for a no-op update, so existence is
        // decided by re-reading the row
        let updated = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User not found: {}", id)))?;

        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User not found: {}", id)));
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
