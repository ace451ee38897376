// Bulk replace / wipe of whole tables

use crate::db::repositories::RecordStore;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{Post, Table, User, UserRow};
use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlConnection};
use sqlx::{QueryBuilder, Transaction};
use tracing::{info, instrument, warn};

/// Rows per INSERT statement. Keeps users (8 columns) well under
/// MySQL's 65535 placeholder limit.
pub const INSERT_CHUNK_ROWS: usize = 1000;

/// Repository for transactional whole-table operations
#[derive(Clone)]
pub struct RecordRepository {
    pool: DbPool,
}

impl RecordRepository {
    /// Create a new RecordRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Finish a transaction: commit on success, roll back on failure.
    /// The connection goes back to the pool either way.
    async fn finish<T>(
        tx: Transaction<'static, MySql>,
        outcome: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match outcome {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                tracing::error!(error = %err, "Bulk operation rolled back");
                Err(err)
            }
        }
    }

    /// Empty the given tables with referential-integrity checks suspended.
    ///
    /// `DELETE` rather than `TRUNCATE`: TRUNCATE commits implicitly on MySQL,
    /// which would make the surrounding rollback a no-op.
    async fn clear_tables(
        conn: &mut MySqlConnection,
        tables: &[Table],
    ) -> Result<(), DatabaseError> {
        sqlx::query("SET FOREIGN_KEY_CHECKS = 0").execute(&mut *conn).await?;

        let mut cleared = Ok(());
        for table in tables {
            let statement = format!("DELETE FROM {}", table.as_str());
            if let Err(e) = sqlx::query(&statement).execute(&mut *conn).await {
                cleared = Err(DatabaseError::from(e));
                break;
            }
        }

        // Re-enable even when a DELETE failed; the setting is per-session and
        // the connection is going back to the pool
        sqlx::query("SET FOREIGN_KEY_CHECKS = 1").execute(&mut *conn).await?;
        cleared
    }

    async fn insert_users(
        conn: &mut MySqlConnection,
        users: &[User],
    ) -> Result<u64, DatabaseError> {
        let rows = users
            .iter()
            .map(UserRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut inserted = 0;
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::<MySql>::new(
                "INSERT INTO users (id, name, username, email, address, phone, website, company) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(row.id)
                    .push_bind(row.name.clone())
                    .push_bind(row.username.clone())
                    .push_bind(row.email.clone())
                    .push_bind(row.address.clone())
                    .push_bind(row.phone.clone())
                    .push_bind(row.website.clone())
                    .push_bind(row.company.clone());
            });
            inserted += builder.build().execute(&mut *conn).await?.rows_affected();
        }

        Ok(inserted)
    }

    async fn insert_posts(
        conn: &mut MySqlConnection,
        posts: &[Post],
    ) -> Result<u64, DatabaseError> {
        let mut inserted = 0;
        for chunk in posts.chunks(INSERT_CHUNK_ROWS) {
            let mut builder =
                QueryBuilder::<MySql>::new("INSERT INTO posts (id, userId, title, body) ");
            builder.push_values(chunk, |mut b, post| {
                b.push_bind(post.id)
                    .push_bind(post.user_id)
                    .push_bind(post.title.clone())
                    .push_bind(post.body.clone());
            });
            inserted += builder.build().execute(&mut *conn).await?.rows_affected();
        }

        Ok(inserted)
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    #[instrument(skip(self, users), fields(count = users.len()))]
    async fn replace_users(&self, users: &[User]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let outcome = async {
            Self::clear_tables(&mut tx, &[Table::Users]).await?;
            Self::insert_users(&mut tx, users).await
        }
        .await;

        let inserted = Self::finish(tx, outcome).await?;
        info!(rows = inserted, "Users table replaced");
        Ok(inserted)
    }

    #[instrument(skip(self, posts), fields(count = posts.len()))]
    async fn replace_posts(&self, posts: &[Post]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let outcome = async {
            Self::clear_tables(&mut tx, &[Table::Posts]).await?;
            Self::insert_posts(&mut tx, posts).await
        }
        .await;

        let inserted = Self::finish(tx, outcome).await?;
        info!(rows = inserted, "Posts table replaced");
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let outcome = Self::clear_tables(&mut tx, &[Table::Posts, Table::Users]).await;

        Self::finish(tx, outcome).await?;
        info!("All records deleted");
        Ok(())
    }
}
